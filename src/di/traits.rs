//! Trait definitions for dependency injection

use crate::core::SysrootResult;
use crate::graph::PackageGraph;
use crate::package::extractor::ArchiveFormat;
use async_trait::async_trait;
use std::path::Path;

/// Trait for fetching bytes from a URL
///
/// Used for index documents and package artifacts alike. Any failure is a
/// transport failure; callers do not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the whole body of `url`
    async fn fetch(&self, url: &str) -> SysrootResult<Vec<u8>>;

    /// Download `url` into `dest`
    ///
    /// `dest` must only exist afterwards if the download completed.
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> SysrootResult<()>;
}

/// Trait for unpacking one package artifact into the install root
///
/// Files already present in the root are overwritten. A failing extraction is
/// fatal for the run.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, format: ArchiveFormat, archive: &Path, root: &Path) -> SysrootResult<()>;
}

/// Trait for persisting the package graph between runs
///
/// A loaded graph is used exactly as a freshly built one would be.
pub trait GraphStore: Send + Sync {
    /// Load a previously saved graph, if any
    fn load(&self) -> SysrootResult<Option<PackageGraph>>;

    /// Save the graph, replacing any earlier copy
    fn save(&self, graph: &PackageGraph) -> SysrootResult<()>;

    /// Forget the saved graph
    fn clear(&self) -> SysrootResult<()>;
}
