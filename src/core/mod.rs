//! Core module re-exports.
//!
//! The error type and path helpers live in `sysroot-core`.

pub use sysroot_core::core::*;
