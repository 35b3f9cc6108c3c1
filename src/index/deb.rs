//! Debian `Packages` index reader (Raspbian, Ubuntu)
//!
//! Records are `Key: value` lines separated by blank lines. Only `Package`,
//! `Depends` and `Filename` matter here.

use super::expr::debian_depends;
use crate::core::{SysrootError, SysrootResult};
use crate::graph::{PackageGraph, PackageRecord};
use std::io::BufRead;

struct Stanza {
    name: String,
    url: String,
    dependencies: Vec<String>,
}

/// Parse a decompressed `Packages` document into `graph`
///
/// Records already in `graph` survive unless the document redefines the same
/// name. Returns the number of records read.
pub fn parse_packages<R: BufRead>(
    reader: R,
    base_url: &str,
    graph: &mut PackageGraph,
) -> SysrootResult<usize> {
    let mut current: Option<Stanza> = None;
    let mut count = 0;

    for line in reader.lines() {
        let line = line.map_err(|e| {
            SysrootError::Transport(format!("Failed to read package index: {}", e))
        })?;

        if line.trim().is_empty() {
            count += flush(current.take(), graph);
            continue;
        }

        // Continuation of a multi-line field (Description and friends)
        if line.starts_with(' ') || line.starts_with('\t') {
            continue;
        }

        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        let value = value.trim();

        match key {
            "Package" => {
                count += flush(current.take(), graph);
                current = Some(Stanza {
                    name: value.to_string(),
                    url: base_url.to_string(),
                    dependencies: Vec::new(),
                });
            }
            "Depends" => {
                if let Some(stanza) = current.as_mut() {
                    stanza
                        .dependencies
                        .extend(debian_depends(value).map(str::to_string));
                }
            }
            "Filename" => {
                if let Some(stanza) = current.as_mut() {
                    stanza.url = format!("{}/{}", base_url, value);
                }
            }
            _ => {}
        }
    }

    count += flush(current.take(), graph);
    Ok(count)
}

fn flush(stanza: Option<Stanza>, graph: &mut PackageGraph) -> usize {
    match stanza {
        Some(stanza) => {
            graph.insert(
                stanza.name,
                PackageRecord::new(stanza.url, stanza.dependencies),
            );
            1
        }
        None => 0,
    }
}
