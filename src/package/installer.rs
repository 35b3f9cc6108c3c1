//! Sysroot installer: index → closure → download/extract → symlink fixup

use crate::core::path::ensure_dir;
use crate::core::{SysrootError, SysrootResult};
use crate::di::ServiceContainer;
use crate::distro::{Family, Selection};
use crate::graph::PackageGraph;
use crate::index;
use crate::package::symlinks::normalize_symlinks;
use crate::resolver::{resolve, IgnoreSet, ResolvedSet};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What an install run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Size of the dependency closure
    pub resolved: usize,
    /// Packages downloaded and extracted in this run
    pub fetched: Vec<String>,
    /// Packages whose artifact was already present in the root
    pub skipped: Vec<String>,
    /// Absolute symlinks rewritten
    pub symlinks_fixed: usize,
}

/// Installs packages of one distribution selection into one root
pub struct Installer {
    root: PathBuf,
    selection: Selection,
    services: ServiceContainer,
    ignore: IgnoreSet,
}

impl Installer {
    /// Create a new installer with injected dependencies
    pub fn new(root: &Path, selection: Selection, services: ServiceContainer) -> Self {
        Self {
            root: root.to_path_buf(),
            selection,
            services,
            ignore: IgnoreSet::builtin(),
        }
    }

    /// Forget the stored package graph so the next run downloads the index
    pub fn refresh_index(&self) -> SysrootResult<()> {
        debug!("Discarding stored package database");
        self.services.graph_store().clear()
    }

    /// Load the package graph from the store, or build and store it
    pub async fn load_graph(&self) -> SysrootResult<PackageGraph> {
        if let Some(graph) = self.services.graph_store().load()? {
            println!("Loading package database...");
            if let Some(message) = stale_cache_warning(self.selection.family()) {
                warn!("{}", message);
            }
            return Ok(graph);
        }

        println!("Downloading package database...");
        let graph =
            index::build_graph(&self.selection.sources, self.services.transport()).await?;
        self.services.graph_store().save(&graph)?;
        Ok(graph)
    }

    /// Install `packages` and everything they depend on
    pub async fn install<S: AsRef<str>>(&self, packages: &[S]) -> SysrootResult<InstallReport> {
        ensure_dir(&self.root)?;

        let graph = self.load_graph().await?;

        println!("Resolving dependencies...");
        let resolved = resolve(packages, &graph, &self.ignore)?;

        println!("Downloading...");
        let (fetched, skipped) = self.fetch_and_extract(&resolved, &graph).await?;

        if self.selection.family() == Family::Alpine {
            self.remove_target_tree()?;
        }

        println!("Fixing symlinks...");
        let symlinks_fixed = normalize_symlinks(&self.root)?;

        println!("Done!");
        Ok(InstallReport {
            resolved: resolved.len(),
            fetched,
            skipped,
            symlinks_fixed,
        })
    }

    /// Download and extract each member of `resolved` not already present
    ///
    /// The artifact file left in the root marks a package as done; a later
    /// run skips it entirely.
    pub async fn fetch_and_extract(
        &self,
        resolved: &ResolvedSet,
        graph: &PackageGraph,
    ) -> SysrootResult<(Vec<String>, Vec<String>)> {
        let total = resolved.len();
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} packages")
                .map_err(|e| SysrootError::Config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );

        let format = self.selection.family().archive_format();
        let mut fetched = Vec::new();
        let mut skipped = Vec::new();

        for (i, name) in resolved.iter().enumerate() {
            pb.println(format!("({}/{}) {}", i + 1, total, name));

            let record = graph.get(name).ok_or_else(|| SysrootError::UnknownPackage {
                name: name.to_string(),
                required_by: None,
            })?;
            let dest = self.root.join(artifact_file_name(&record.url)?);

            if dest.is_file() {
                debug!("{} already fetched", dest.display());
                skipped.push(name.to_string());
            } else {
                self.services
                    .transport()
                    .fetch_to_file(&record.url, &dest)
                    .await?;
                self.services
                    .extractor()
                    .extract(format, &dest, &self.root)
                    .await?;
                fetched.push(name.to_string());
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok((fetched, skipped))
    }

    // usr/<target-triple> from Alpine cross packages shadows the cross
    // compiler's own search paths
    fn remove_target_tree(&self) -> SysrootResult<()> {
        let Some(target) = self.selection.target.as_deref() else {
            return Ok(());
        };

        let tree = self.root.join("usr").join(target);
        if tree.is_dir() {
            debug!("Removing {}", tree.display());
            fs::remove_dir_all(&tree)?;
        }
        Ok(())
    }
}

/// Warning for families whose stored package database goes stale quickly
pub fn stale_cache_warning(family: Family) -> Option<&'static str> {
    match family {
        Family::Arch => Some(
            "Arch Linux ARM package database goes out of date quickly; \
             rerun with --refresh-index if downloads fail",
        ),
        Family::Debian | Family::Alpine => None,
    }
}

/// Local file name for a package URL: the last segment of its path
pub fn artifact_file_name(url: &str) -> SysrootResult<String> {
    let parsed = Url::parse(url)
        .map_err(|e| SysrootError::Index(format!("Invalid package URL {}: {}", url, e)))?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SysrootError::Index(format!("Package URL {} has no file name", url)))
}
