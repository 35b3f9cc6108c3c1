use std::path::PathBuf;
use thiserror::Error;

pub type SysrootResult<T> = Result<T, SysrootError>;

#[derive(Error, Debug)]
pub enum SysrootError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Path error: {0}")]
    Path(String),

    /// Missing or unsupported distribution/target input. Raised before any
    /// network activity.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or decompression failure while obtaining an index or artifact.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The index payload could not be read.
    #[error("Index error: {0}")]
    Index(String),

    #[error("{}", unknown_package_message(.name, .required_by.as_deref()))]
    UnknownPackage {
        name: String,
        required_by: Option<String>,
    },

    /// The external extraction tool exited non-zero.
    #[error("Extraction of {} failed: {status}", .archive.display())]
    Extraction { archive: PathBuf, status: String },
}

fn unknown_package_message(name: &str, required_by: Option<&str>) -> String {
    match required_by {
        Some(parent) => format!(
            "Package '{}' (required by '{}') not found in package database",
            name, parent
        ),
        None => format!("Package '{}' not found in package database", name),
    }
}
