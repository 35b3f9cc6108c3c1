//! Service container for dependency injection

use super::traits::{Extractor, GraphStore, Transport};
use crate::cache::FileGraphStore;
use crate::package::extractor::CommandExtractor;
use crate::transport::HttpTransport;
use std::path::Path;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the external collaborators of an install run behind trait objects,
/// so tests can swap in the mocks from [`super::mocks`].
///
/// # Example (Testing)
///
/// ```
/// use sysroot::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let transport = Arc::new(MockTransport::new());
/// let extractor = Arc::new(MockExtractor::new());
/// let store = Arc::new(MemoryGraphStore::new());
///
/// let container = ServiceContainer::with_providers(transport, extractor, store);
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub transport: Arc<dyn Transport>,
    pub extractor: Arc<dyn Extractor>,
    pub graph_store: Arc<dyn GraphStore>,
}

impl ServiceContainer {
    /// Create a service container with production implementations
    ///
    /// - HTTP transport (reqwest)
    /// - `dpkg-deb` / `tar` extraction
    /// - package graph cached in `<install_root>/.db.json`
    pub fn new(install_root: &Path) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
            extractor: Arc::new(CommandExtractor::new()),
            graph_store: Arc::new(FileGraphStore::for_install_root(install_root)),
        }
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn Extractor>,
        graph_store: Arc<dyn GraphStore>,
    ) -> Self {
        Self {
            transport,
            extractor,
            graph_store,
        }
    }

    /// Get the transport
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Get the extractor
    pub fn extractor(&self) -> &dyn Extractor {
        self.extractor.as_ref()
    }

    /// Get the package graph store
    pub fn graph_store(&self) -> &dyn GraphStore {
        self.graph_store.as_ref()
    }
}
