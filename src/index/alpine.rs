//! Alpine `APKINDEX` reader
//!
//! Each package is a block of `X:value` lines (`P` name, `V` version,
//! `D` dependencies, `p` provides) terminated by a blank line. Packages may be
//! referenced through any name they provide, so the index is collected first
//! and only turned into graph records once every repository has been read.

use super::expr::strip_operator;
use crate::core::{SysrootError, SysrootResult};
use crate::graph::{PackageGraph, PackageRecord};
use std::collections::HashMap;
use std::io::Read;
use tar::Archive;
use tracing::debug;

#[derive(Debug, Clone)]
struct ApkEntry {
    name: String,
    version: String,
    depends: Vec<String>,
    base_url: String,
}

#[derive(Debug, Default)]
struct Block {
    name: Option<String>,
    version: Option<String>,
    depends: Vec<String>,
    provides: Vec<String>,
}

/// Package metadata keyed by real name and by every provided alias
#[derive(Debug, Default)]
pub struct AlpineIndex {
    entries: HashMap<String, ApkEntry>,
}

impl AlpineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a decompressed `APKINDEX.tar.gz` stream
    ///
    /// `base_url` is the repository directory the `.apk` files live in.
    pub fn read_archive<R: Read>(&mut self, reader: R, base_url: &str) -> SysrootResult<usize> {
        let mut archive = Archive::new(reader);
        // The signature and the index are separate tar streams glued together
        archive.set_ignore_zeros(true);

        let entries = archive
            .entries()
            .map_err(|e| SysrootError::Transport(format!("Failed to read APKINDEX: {}", e)))?;

        for entry in entries {
            let mut entry = entry
                .map_err(|e| SysrootError::Transport(format!("Failed to read APKINDEX: {}", e)))?;
            if entry.path()?.as_os_str() != "APKINDEX" {
                continue;
            }

            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|e| SysrootError::Index(format!("APKINDEX: {}", e)))?;
            return Ok(self.read_index(&text, base_url));
        }

        Err(SysrootError::Index(format!(
            "{}: archive has no APKINDEX entry",
            base_url
        )))
    }

    /// Read the plain-text index document. Returns the number of packages.
    pub fn read_index(&mut self, text: &str, base_url: &str) -> usize {
        let mut block = Block::default();
        let mut count = 0;

        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                count += self.commit(std::mem::take(&mut block), base_url);
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            match field {
                "P" => block.name = Some(value.to_string()),
                "V" => block.version = Some(value.to_string()),
                "D" => block.depends = words(value),
                "p" => block.provides = words(value),
                _ => {}
            }
        }

        count + self.commit(block, base_url)
    }

    // Later blocks overwrite earlier ones under the same key, including an
    // alias that collides with a real package name.
    fn commit(&mut self, block: Block, base_url: &str) -> usize {
        let (Some(name), Some(version)) = (block.name, block.version) else {
            return 0;
        };

        let entry = ApkEntry {
            name: name.clone(),
            version,
            depends: block.depends,
            base_url: base_url.to_string(),
        };
        for alias in &block.provides {
            self.entries
                .insert(strip_operator(alias).to_string(), entry.clone());
        }
        self.entries.insert(name, entry);
        1
    }

    /// Emit graph records for every known name
    ///
    /// Alias keys get the same URL and dependency list as the package that
    /// provides them. Dependencies are rewritten to real package names;
    /// conflicts (`!name`) and names nothing provides are dropped.
    pub fn into_graph(self, graph: &mut PackageGraph) -> usize {
        let mut count = 0;

        for (key, entry) in &self.entries {
            let url = format!("{}/{}-{}.apk", entry.base_url, entry.name, entry.version);
            let dependencies = entry
                .depends
                .iter()
                .filter(|d| !d.starts_with('!'))
                .filter_map(|d| {
                    let bare = strip_operator(d);
                    match self.entries.get(bare) {
                        Some(target) => Some(target.name.clone()),
                        None => {
                            debug!("{}: dropping unresolvable dependency {}", entry.name, d);
                            None
                        }
                    }
                })
                .collect();

            graph.insert(key.clone(), PackageRecord::new(url, dependencies));
            count += 1;
        }

        count
    }
}

fn words(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
