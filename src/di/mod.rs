//! Dependency injection infrastructure
//!
//! The network, the extraction tools and the package graph cache sit behind
//! traits so the parsers, the resolver and the installer can be exercised
//! without any of them.
//!
//! # Example (Production)
//! ```no_run
//! use sysroot::di::ServiceContainer;
//! use std::path::Path;
//!
//! let container = ServiceContainer::new(Path::new("/tmp/sysroot"));
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{Extractor, GraphStore, Transport};
