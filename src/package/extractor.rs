use crate::core::{SysrootError, SysrootResult};
use crate::di::Extractor;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Artifact format of a distribution family's packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Debian `.deb`, unpacked with `dpkg-deb -x`
    Deb,
    /// xz-compressed tarball (Arch Linux ARM `.pkg.tar.xz`)
    TarXz,
    /// gzip-compressed tarball (Alpine `.apk`)
    TarGz,
}

impl ArchiveFormat {
    fn command(self, archive: &Path, root: &Path) -> Command {
        match self {
            ArchiveFormat::Deb => {
                let mut cmd = Command::new("dpkg-deb");
                cmd.arg("-x").arg(archive).arg(root);
                cmd
            }
            ArchiveFormat::TarXz | ArchiveFormat::TarGz => {
                let flags = if self == ArchiveFormat::TarXz {
                    "-xJf"
                } else {
                    "-xzf"
                };
                let mut cmd = Command::new("tar");
                cmd.arg("--force-local")
                    .arg("-C")
                    .arg(root)
                    .arg(flags)
                    .arg(archive)
                    // apk metadata and unknown-keyword warnings
                    .stderr(Stdio::null());
                cmd
            }
        }
    }
}

/// Unpacks packages with the system `dpkg-deb` / `tar` tools
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExtractor;

impl CommandExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for CommandExtractor {
    async fn extract(&self, format: ArchiveFormat, archive: &Path, root: &Path) -> SysrootResult<()> {
        debug!("Extracting {} ({:?})", archive.display(), format);

        let status = format
            .command(archive, root)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| SysrootError::Extraction {
                archive: archive.to_path_buf(),
                status: e.to_string(),
            })?;

        if !status.success() {
            return Err(SysrootError::Extraction {
                archive: archive.to_path_buf(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
