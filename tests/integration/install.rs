//! End-to-end install flows against in-memory services

use super::common::{gzip, tar_gz};
use std::path::Path;
use std::sync::Arc;
use sysroot::config::Config;
use sysroot::di::mocks::{MemoryGraphStore, MockExtractor, MockTransport};
use sysroot::di::ServiceContainer;
use sysroot::distro::{Distro, Selection};
use sysroot::graph::{PackageGraph, PackageRecord};
use sysroot::package::{ArchiveFormat, Installer};
use sysroot::SysrootError;
use tempfile::TempDir;

const ARCHIVE: &str = "http://archive.test/debian";
const RASPBIAN: &str = "http://raspbian.test/raspbian";

const ARCHIVE_PACKAGES: &str = "\
Package: raspberrypi-libs
Version: 1.20200212-1
Filename: pool/main/r/raspberrypi-firmware/raspberrypi-libs_1.20200212-1_armhf.deb
Description: EGL/GLES/OpenVG/etc. libraries for the Raspberry Pi
 Continuation line mentioning Depends: nothing

";

const RASPBIAN_PACKAGES: &str = "\
Package: libc6
Version: 2.28-10+rpi1
Depends: libgomp1
Filename: pool/main/g/glibc/libc6_2.28-10+rpi1_armhf.deb

Package: zlib1g
Version: 1:1.2.11.dfsg-1
Pre-Depends: dpkg (>= 1.15.6)
Depends: libc6 (>= 2.4)
Filename: pool/main/z/zlib/zlib1g_1.2.11.dfsg-1_armhf.deb

Package: zlib1g-dev
Version: 1:1.2.11.dfsg-1
Depends: zlib1g (= 1:1.2.11.dfsg-1), libc6-dev | libc-dev
Filename: pool/main/z/zlib/zlib1g-dev_1.2.11.dfsg-1_armhf.deb

Package: libc6-dev
Version: 2.28-10+rpi1
Depends: libc6 (= 2.28-10+rpi1), libatomic1
Filename: pool/main/g/glibc/libc6-dev_2.28-10+rpi1_armhf.deb
";

fn raspbian_config() -> Config {
    Config {
        raspbian_archive: ARCHIVE.to_string(),
        raspbian_main: RASPBIAN.to_string(),
        ..Config::default()
    }
}

fn raspbian_transport() -> MockTransport {
    let transport = MockTransport::new();
    transport.add_response(
        format!("{}/dists/buster/main/binary-armhf/Packages.gz", ARCHIVE),
        gzip(ARCHIVE_PACKAGES.as_bytes()),
    );
    transport.add_response(
        format!("{}/dists/buster/main/binary-armhf/Packages.gz", RASPBIAN),
        gzip(RASPBIAN_PACKAGES.as_bytes()),
    );
    for file in [
        "pool/main/g/glibc/libc6_2.28-10+rpi1_armhf.deb",
        "pool/main/z/zlib/zlib1g_1.2.11.dfsg-1_armhf.deb",
        "pool/main/z/zlib/zlib1g-dev_1.2.11.dfsg-1_armhf.deb",
        "pool/main/g/glibc/libc6-dev_2.28-10+rpi1_armhf.deb",
    ] {
        transport.add_response(format!("{}/{}", RASPBIAN, file), b"!<arch>\n".to_vec());
    }
    transport
}

fn installer(
    root: &Path,
    selection: Selection,
    transport: &MockTransport,
    extractor: &MockExtractor,
    store: &MemoryGraphStore,
) -> Installer {
    let services = ServiceContainer::with_providers(
        Arc::new(transport.clone()),
        Arc::new(extractor.clone()),
        Arc::new(store.clone()),
    );
    Installer::new(root, selection, services)
}

fn file_names(calls: &[(ArchiveFormat, std::path::PathBuf)]) -> Vec<String> {
    calls
        .iter()
        .map(|(_, path)| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_raspbian_install_resolves_and_extracts_closure() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let selection = Selection::new(Distro::Raspbian, None, None, &raspbian_config()).unwrap();
    let transport = raspbian_transport();
    let extractor = MockExtractor::new();
    let store = MemoryGraphStore::new();

    let report = installer(&root, selection, &transport, &extractor, &store)
        .install(&["zlib1g-dev"])
        .await
        .unwrap();

    // libgomp1 and libatomic1 are on the ignore list
    assert_eq!(report.resolved, 4);
    assert_eq!(
        report.fetched,
        vec!["libc6", "libc6-dev", "zlib1g", "zlib1g-dev"]
    );
    assert!(report.skipped.is_empty());
    assert_eq!(store.save_count(), 1);

    let extracted = extractor.calls();
    assert!(extracted.iter().all(|(format, _)| *format == ArchiveFormat::Deb));
    assert_eq!(
        file_names(&extracted),
        vec![
            "libc6_2.28-10+rpi1_armhf.deb",
            "libc6-dev_2.28-10+rpi1_armhf.deb",
            "zlib1g_1.2.11.dfsg-1_armhf.deb",
            "zlib1g-dev_1.2.11.dfsg-1_armhf.deb",
        ]
    );
    assert!(root.join("zlib1g_1.2.11.dfsg-1_armhf.deb").is_file());
    // Two index documents plus four packages
    assert_eq!(transport.requests().len(), 6);
}

#[tokio::test]
async fn test_second_run_downloads_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let config = raspbian_config();
    let transport = raspbian_transport();
    let extractor = MockExtractor::new();
    let store = MemoryGraphStore::new();

    let first = installer(
        &root,
        Selection::new(Distro::Raspbian, None, None, &config).unwrap(),
        &transport,
        &extractor,
        &store,
    );
    first.install(&["zlib1g"]).await.unwrap();
    let requests_after_first = transport.requests().len();

    let second = installer(
        &root,
        Selection::new(Distro::Raspbian, None, None, &config).unwrap(),
        &transport,
        &extractor,
        &store,
    );
    let report = second.install(&["zlib1g"]).await.unwrap();

    assert_eq!(transport.requests().len(), requests_after_first);
    assert!(report.fetched.is_empty());
    assert_eq!(report.skipped, vec!["libc6", "zlib1g"]);
    assert_eq!(extractor.calls().len(), 2);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn test_refresh_index_rebuilds_stored_graph() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let selection = Selection::new(Distro::Raspbian, None, None, &raspbian_config()).unwrap();
    let transport = raspbian_transport();
    let extractor = MockExtractor::new();

    // Points at an artifact the mirror no longer serves
    let stale: PackageGraph = [(
        "zlib1g".to_string(),
        PackageRecord::new(format!("{}/pool/main/z/zlib/zlib1g_1.2.8_armhf.deb", RASPBIAN), vec![]),
    )]
    .into_iter()
    .collect();
    let store = MemoryGraphStore::with_graph(stale);

    let installer = installer(&root, selection, &transport, &extractor, &store);
    installer.refresh_index().unwrap();
    let report = installer.install(&["zlib1g"]).await.unwrap();

    let index_fetches = transport
        .requests()
        .iter()
        .filter(|url| url.ends_with("Packages.gz"))
        .count();
    assert_eq!(index_fetches, 2);
    assert_eq!(store.save_count(), 1);
    assert_eq!(report.fetched, vec!["libc6", "zlib1g"]);
    assert!(root.join("zlib1g_1.2.11.dfsg-1_armhf.deb").is_file());
}

#[tokio::test]
async fn test_extraction_failure_aborts_install() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let selection = Selection::new(Distro::Raspbian, None, None, &raspbian_config()).unwrap();
    let transport = raspbian_transport();
    let extractor = MockExtractor::new();
    extractor.fail_on("zlib1g_1.2.11.dfsg-1_armhf.deb");
    let store = MemoryGraphStore::new();

    let result = installer(&root, selection, &transport, &extractor, &store)
        .install(&["zlib1g-dev"])
        .await;

    match result {
        Err(SysrootError::Extraction { archive, .. }) => {
            assert!(archive.ends_with("zlib1g_1.2.11.dfsg-1_armhf.deb"));
        }
        other => panic!("Expected Extraction error, got {:?}", other),
    }
    // Packages after the failing one were never touched
    assert_eq!(
        file_names(&extractor.calls()),
        vec!["libc6_2.28-10+rpi1_armhf.deb", "libc6-dev_2.28-10+rpi1_armhf.deb"]
    );
}

#[tokio::test]
async fn test_unknown_package_fails_before_downloading_artifacts() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let selection = Selection::new(Distro::Raspbian, None, None, &raspbian_config()).unwrap();
    let transport = raspbian_transport();
    let extractor = MockExtractor::new();
    let store = MemoryGraphStore::new();

    let result = installer(&root, selection, &transport, &extractor, &store)
        .install(&["zlib1g", "libsdl2-dev"])
        .await;

    match result {
        Err(SysrootError::UnknownPackage { name, required_by }) => {
            assert_eq!(name, "libsdl2-dev");
            assert_eq!(required_by, None);
        }
        other => panic!("Expected UnknownPackage error, got {:?}", other),
    }
    assert!(extractor.calls().is_empty());
    assert!(transport.requests().iter().all(|url| url.ends_with("Packages.gz")));
}

#[cfg(unix)]
#[tokio::test]
async fn test_alpine_install_removes_target_tree_and_fixes_links() {
    const MIRROR: &str = "http://alpine.test/alpine";
    const TARGET: &str = "armv7-alpine-linux-musleabihf";
    let apkindex = "\
C:Q1abc=
P:musl
V:1.1.24-r9
D:
p:so:libc.musl-armv7.so.1=1

P:musl-dev
V:1.1.24-r9
D:musl=1.1.24-r9 so:libc.musl-armv7.so.1 !uclibc-dev
";

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let config = Config {
        alpine_mirror: MIRROR.to_string(),
        ..Config::default()
    };
    let selection = Selection::new(Distro::Alpine, None, Some(TARGET), &config).unwrap();

    let transport = MockTransport::new();
    let repo = format!("{}/v3.12/main/armhf", MIRROR);
    transport.add_response(
        format!("{}/APKINDEX.tar.gz", repo),
        tar_gz(&[("DESCRIPTION", "v3.12.0"), ("APKINDEX", apkindex)]),
    );
    transport.add_response(format!("{}/musl-1.1.24-r9.apk", repo), b"apk".to_vec());
    transport.add_response(format!("{}/musl-dev-1.1.24-r9.apk", repo), b"apk".to_vec());

    // What extraction would have left behind
    std::fs::create_dir_all(root.join("usr").join(TARGET).join("lib")).unwrap();
    std::fs::create_dir_all(root.join("usr/lib")).unwrap();
    std::fs::write(root.join("usr").join(TARGET).join("lib/crt1.o"), b"").unwrap();
    std::os::unix::fs::symlink("/lib/libc.musl-armv7.so.1", root.join("usr/lib/libc.so")).unwrap();

    let extractor = MockExtractor::new();
    let store = MemoryGraphStore::new();
    let report = installer(&root, selection, &transport, &extractor, &store)
        .install(&["musl-dev"])
        .await
        .unwrap();

    assert_eq!(report.fetched, vec!["musl", "musl-dev"]);
    assert_eq!(report.symlinks_fixed, 1);
    assert!(extractor
        .calls()
        .iter()
        .all(|(format, _)| *format == ArchiveFormat::TarGz));
    assert!(!root.join("usr").join(TARGET).exists());
    assert_eq!(
        std::fs::read_link(root.join("usr/lib/libc.so")).unwrap(),
        Path::new("../../lib/libc.musl-armv7.so.1")
    );
}

#[tokio::test]
async fn test_arch_uses_cached_graph() {
    const REPO: &str = "http://alarm.test/armv7h/core";

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("sysroot");
    let selection = Selection::new(
        Distro::Alarm,
        None,
        Some("armv7-unknown-linux-gnueabihf"),
        &Config::default(),
    )
    .unwrap();

    let graph: PackageGraph = [
        (
            "zlib".to_string(),
            PackageRecord::new(
                format!("{}/zlib-1.2.11-4-armv7h.pkg.tar.xz", REPO),
                vec!["glibc".to_string()],
            ),
        ),
        (
            "glibc".to_string(),
            PackageRecord::new(format!("{}/glibc-2.31-2-armv7h.pkg.tar.xz", REPO), vec![]),
        ),
    ]
    .into_iter()
    .collect();
    let store = MemoryGraphStore::with_graph(graph);

    let transport = MockTransport::new();
    transport.add_response(format!("{}/zlib-1.2.11-4-armv7h.pkg.tar.xz", REPO), b"xz".to_vec());
    transport.add_response(format!("{}/glibc-2.31-2-armv7h.pkg.tar.xz", REPO), b"xz".to_vec());
    let extractor = MockExtractor::new();

    let report = installer(&root, selection, &transport, &extractor, &store)
        .install(&["zlib"])
        .await
        .unwrap();

    assert_eq!(report.fetched, vec!["glibc", "zlib"]);
    assert!(transport.requests().iter().all(|url| url.contains(".pkg.tar.xz")));
    assert_eq!(store.save_count(), 0);
    assert!(extractor
        .calls()
        .iter()
        .all(|(format, _)| *format == ArchiveFormat::TarXz));
}
