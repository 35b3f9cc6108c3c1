//! Arch Linux ARM repository database reader
//!
//! A `<repo>.db.tar.gz` holds one directory per package with a `desc` entry
//! (name, filename) and a `depends` entry. Entries are gathered per directory
//! and a package is emitted as soon as both have been seen. Newer databases
//! fold `%DEPENDS%` into `desc` and ship no `depends` entries at all; those
//! packages are emitted once the stream ends.

use super::expr::strip_operator;
use crate::core::{SysrootError, SysrootResult};
use crate::graph::{PackageGraph, PackageRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tar::Archive;
use tracing::debug;

#[derive(Debug, Default)]
struct PendingPackage {
    name: Option<String>,
    filename: Option<String>,
    depends: Vec<String>,
    desc_seen: bool,
    depends_seen: bool,
}

impl PendingPackage {
    fn is_complete(&self) -> bool {
        self.desc_seen && self.depends_seen
    }

    fn into_record(self, repo_base: &str, key: &str) -> SysrootResult<(String, PackageRecord)> {
        let name = self
            .name
            .ok_or_else(|| SysrootError::Index(format!("{}: desc has no %NAME%", key)))?;
        let filename = self
            .filename
            .ok_or_else(|| SysrootError::Index(format!("{}: desc has no %FILENAME%", key)))?;
        let url = format!("{}/{}", repo_base, filename);
        Ok((name, PackageRecord::new(url, self.depends)))
    }
}

/// Split a pacman database file into `%SECTION%` blocks
fn sections(text: &str) -> Vec<(&str, Vec<&str>)> {
    let mut out: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut open = false;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            open = false;
        } else if line.len() > 2 && line.starts_with('%') && line.ends_with('%') {
            out.push((&line[1..line.len() - 1], Vec::new()));
            open = true;
        } else if open {
            if let Some((_, values)) = out.last_mut() {
                values.push(line);
            }
        }
    }

    out
}

fn read_desc(text: &str, pending: &mut PendingPackage) {
    for (section, values) in sections(text) {
        match section {
            "NAME" => pending.name = values.first().map(|v| v.to_string()),
            "FILENAME" => pending.filename = values.first().map(|v| v.to_string()),
            "DEPENDS" => pending
                .depends
                .extend(values.iter().map(|d| strip_operator(d).to_string())),
            _ => {}
        }
    }
    pending.desc_seen = true;
}

fn read_depends(text: &str, pending: &mut PendingPackage) {
    for (section, values) in sections(text) {
        if section == "DEPENDS" {
            pending
                .depends
                .extend(values.iter().map(|d| strip_operator(d).to_string()));
        }
    }
    pending.depends_seen = true;
}

/// Parse a decompressed repository database tarball into `graph`
///
/// `repo_base` is the directory URL the `%FILENAME%` entries are relative to.
/// Returns the number of packages emitted.
pub fn parse_db<R: Read>(reader: R, repo_base: &str, graph: &mut PackageGraph) -> SysrootResult<usize> {
    let mut archive = Archive::new(reader);
    let mut pending: HashMap<String, PendingPackage> = HashMap::new();
    let mut split_layout = false;
    let mut count = 0;

    let entries = archive
        .entries()
        .map_err(|e| SysrootError::Transport(format!("Failed to read package database: {}", e)))?;

    for entry in entries {
        let mut entry = entry
            .map_err(|e| SysrootError::Transport(format!("Failed to read package database: {}", e)))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path()?.into_owned();
        let kind = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if kind != "desc" && kind != "depends" {
            continue;
        }
        let key = package_key(&path);

        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|e| SysrootError::Index(format!("{}: {}", path.display(), e)))?;

        let slot = pending.entry(key.clone()).or_default();
        if kind == "desc" {
            read_desc(&text, slot);
        } else {
            split_layout = true;
            read_depends(&text, slot);
        }

        if slot.is_complete() {
            if let Some(done) = pending.remove(&key) {
                let (name, record) = done.into_record(repo_base, &key)?;
                graph.insert(name, record);
                count += 1;
            }
        }
    }

    for (key, leftover) in pending {
        if !split_layout && leftover.desc_seen {
            let (name, record) = leftover.into_record(repo_base, &key)?;
            graph.insert(name, record);
            count += 1;
        } else {
            debug!("Dropping incomplete database entry {}", key);
        }
    }

    Ok(count)
}

fn package_key(path: &Path) -> String {
    path.parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
