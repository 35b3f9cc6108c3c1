//! Core utilities shared by the sysroot tool: the error type and the
//! platform-specific paths used for configuration and the package graph cache.

pub mod core;

pub use crate::core::error::{SysrootError, SysrootResult};
