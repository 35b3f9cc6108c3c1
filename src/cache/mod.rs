//! On-disk package graph cache, one file per install root

use crate::core::path::graph_cache_file;
use crate::core::{SysrootError, SysrootResult};
use crate::di::GraphStore;
use crate::graph::PackageGraph;
use std::fs;
use std::path::{Path, PathBuf};

/// Keeps the package graph as JSON inside the install root
#[derive(Debug, Clone)]
pub struct FileGraphStore {
    path: PathBuf,
}

impl FileGraphStore {
    /// Store for the given install root (`<root>/.db.json`)
    pub fn for_install_root(install_root: &Path) -> Self {
        Self {
            path: graph_cache_file(install_root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphStore for FileGraphStore {
    fn load(&self) -> SysrootResult<Option<PackageGraph>> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let content = fs::read(&self.path).map_err(|e| {
            SysrootError::Path(format!(
                "Failed to read package database {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(serde_json::from_slice(&content)?))
    }

    fn save(&self, graph: &PackageGraph) -> SysrootResult<()> {
        let content = serde_json::to_vec(graph)?;
        fs::write(&self.path, content).map_err(|e| {
            SysrootError::Path(format!(
                "Failed to write package database {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn clear(&self) -> SysrootResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
