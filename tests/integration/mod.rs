//! Integration tests module
//!
//! Library-level install flows run against the in-memory mocks; the CLI tests
//! only cover paths that fail before any network access.

pub mod cli;
pub mod common;
pub mod install;
