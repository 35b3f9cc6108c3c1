//! Common utilities for integration tests

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::process::Command;
use tar::{Builder, Header};

pub fn sysroot_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysroot"));
    // Never pick up the developer's own config
    cmd.env("SYSROOT_CONFIG", "/nonexistent/sysroot/config.yaml");
    cmd
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for (path, content) in files {
        let mut header = Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, content.as_bytes())
            .unwrap();
    }
    gzip(&builder.into_inner().unwrap())
}
