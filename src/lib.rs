//! Sysroot builder for cross-compilation
//!
//! Fetches binary packages from Debian-family, Arch Linux ARM or Alpine
//! repositories, resolves their dependency closure and unpacks it into a
//! directory usable as a cross compiler's `--sysroot`.

pub use sysroot_core::{SysrootError, SysrootResult};

/// Core module re-exported from sysroot-core.
pub mod core;

/// Configuration management.
pub mod config;

/// Distribution selection.
pub mod distro;

/// Package index readers.
pub mod index;

/// Package graph.
pub mod graph;

/// Dependency resolution.
pub mod resolver;

/// HTTP transport.
pub mod transport;

/// Package graph caching.
pub mod cache;

/// Download, extraction and symlink fixup.
pub mod package;

/// Dependency injection infrastructure.
pub mod di;
