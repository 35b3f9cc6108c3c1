use crate::core::error::{SysrootError, SysrootResult};
use std::path::{Path, PathBuf};

/// Name of the package graph cache kept inside each install root
pub const GRAPH_CACHE_FILE: &str = ".db.json";

/// Get the sysroot home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\sysroot
/// - Linux: ~/.config/sysroot
/// - macOS: ~/Library/Application Support/sysroot
pub fn sysroot_home() -> SysrootResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| SysrootError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("sysroot"))
}

/// Get the config file path
///
/// `SYSROOT_CONFIG` overrides the default `<sysroot_home>/config.yaml`.
pub fn config_file() -> SysrootResult<PathBuf> {
    if let Some(path) = std::env::var_os("SYSROOT_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    Ok(sysroot_home()?.join("config.yaml"))
}

/// Get the package graph cache path for an install root
pub fn graph_cache_file(install_root: &Path) -> PathBuf {
    install_root.join(GRAPH_CACHE_FILE)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> SysrootResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
