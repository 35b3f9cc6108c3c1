pub mod extractor;
pub mod installer;
pub mod symlinks;

pub use extractor::{ArchiveFormat, CommandExtractor};
pub use installer::{InstallReport, Installer};
pub use symlinks::normalize_symlinks;
