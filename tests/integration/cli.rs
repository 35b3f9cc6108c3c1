//! Tests for the command-line surface

use super::common::sysroot_command;
use tempfile::TempDir;

#[test]
fn test_alarm_without_target_fails_before_network() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("root");

    let output = sysroot_command()
        .args(["--distro", "alarm", "--sysroot"])
        .arg(&root)
        .arg("zlib")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--target"),
        "Should explain the missing target, got: {}",
        stderr
    );
    // Rejected before the install root is created
    assert!(!root.exists());
}

#[test]
fn test_alpine_unsupported_target() {
    let temp = TempDir::new().unwrap();

    let output = sysroot_command()
        .args(["--distro", "alpine", "--target", "x86_64-unknown-linux-musl", "--sysroot"])
        .arg(temp.path())
        .arg("musl-dev")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported Alpine target"));
}

#[test]
fn test_packages_are_required() {
    let temp = TempDir::new().unwrap();

    let output = sysroot_command()
        .args(["--distro", "raspbian", "--sysroot"])
        .arg(temp.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_unknown_distro_rejected() {
    let temp = TempDir::new().unwrap();

    let output = sysroot_command()
        .args(["--distro", "gentoo", "--sysroot"])
        .arg(temp.path())
        .arg("zlib")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gentoo"));
}
