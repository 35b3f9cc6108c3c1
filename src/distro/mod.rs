//! Distribution selection
//!
//! Turns the user's distribution, version and target triple into the list of
//! index documents to read. All validation happens here, before anything
//! touches the network.

use crate::config::Config;
use crate::core::{SysrootError, SysrootResult};
use crate::index::IndexSource;
use crate::package::extractor::ArchiveFormat;
use clap::ValueEnum;
use std::fmt;
use tracing::warn;

/// Supported distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Distro {
    Raspbian,
    Ubuntu,
    /// Arch Linux ARM
    Alarm,
    Alpine,
}

/// Index format and package format family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Debian,
    Arch,
    Alpine,
}

impl Distro {
    pub fn family(self) -> Family {
        match self {
            Distro::Raspbian | Distro::Ubuntu => Family::Debian,
            Distro::Alarm => Family::Arch,
            Distro::Alpine => Family::Alpine,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Distro::Raspbian => "raspbian",
            Distro::Ubuntu => "ubuntu",
            Distro::Alarm => "alarm",
            Distro::Alpine => "alpine",
        }
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Family {
    pub fn archive_format(self) -> ArchiveFormat {
        match self {
            Family::Debian => ArchiveFormat::Deb,
            Family::Arch => ArchiveFormat::TarXz,
            Family::Alpine => ArchiveFormat::TarGz,
        }
    }
}

/// A validated distribution + version + architecture choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub distro: Distro,
    /// Target triple, when one was given
    pub target: Option<String>,
    /// Index documents to read, in order
    pub sources: Vec<IndexSource>,
}

impl Selection {
    pub fn new(
        distro: Distro,
        version: Option<&str>,
        target: Option<&str>,
        config: &Config,
    ) -> SysrootResult<Self> {
        if let Some(target) = target {
            check_target(target)?;
        }

        let sources = match distro {
            Distro::Raspbian => {
                let codename = version.unwrap_or(&config.raspbian_version);
                let arch = debian_arch(target)?;
                vec![
                    debian(&config.raspbian_archive, codename, "main", arch),
                    debian(&config.raspbian_main, codename, "main", arch),
                ]
            }
            Distro::Ubuntu => {
                let codename = version.unwrap_or(&config.ubuntu_version);
                let arch = debian_arch(target)?;
                let mut sources = vec![debian(&config.ubuntu_rpi, codename, "main", arch)];
                sources.extend(
                    config
                        .ubuntu_sections
                        .iter()
                        .map(|section| debian(&config.ubuntu_main, codename, section, arch)),
                );
                sources
            }
            Distro::Alarm => {
                let arch = alarm_arch(target)?;
                if let Some(version) = version {
                    warn!("Arch Linux ARM is a rolling release, ignoring version {}", version);
                }
                config
                    .alarm_repos
                    .iter()
                    .map(|repo| IndexSource::Arch {
                        mirror: config.alarm_mirror.clone(),
                        arch: arch.to_string(),
                        repo: repo.clone(),
                    })
                    .collect()
            }
            Distro::Alpine => {
                let arch = alpine_arch(target)?;
                let version = version.unwrap_or(&config.alpine_version);
                config
                    .alpine_repos
                    .iter()
                    .map(|repo| IndexSource::Alpine {
                        mirror: config.alpine_mirror.clone(),
                        version: version.to_string(),
                        repo: repo.clone(),
                        arch: arch.to_string(),
                    })
                    .collect()
            }
        };

        Ok(Self {
            distro,
            target: target.map(str::to_string),
            sources,
        })
    }

    pub fn family(&self) -> Family {
        self.distro.family()
    }
}

fn debian(base: &str, codename: &str, component: &str, arch: &str) -> IndexSource {
    IndexSource::Debian {
        base: base.to_string(),
        codename: codename.to_string(),
        component: component.to_string(),
        arch: arch.to_string(),
    }
}

// The target names a directory under usr/ that Alpine installs remove
fn check_target(target: &str) -> SysrootResult<()> {
    let valid = !target.is_empty()
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !target.contains("..");

    if valid {
        Ok(())
    } else {
        Err(SysrootError::Config(format!("Invalid target triple {:?}", target)))
    }
}

fn debian_arch(target: Option<&str>) -> SysrootResult<&'static str> {
    match target {
        None => Ok("armhf"),
        Some(t) if t.starts_with("aarch64") => Ok("arm64"),
        Some(t) if t.starts_with("arm") => Ok("armhf"),
        Some(t) => Err(SysrootError::Config(format!(
            "Unsupported Debian target {}",
            t
        ))),
    }
}

fn alarm_arch(target: Option<&str>) -> SysrootResult<&'static str> {
    match target {
        None => Err(SysrootError::Config(
            "ALARM target not specified (use --target argument)".to_string(),
        )),
        Some(t) if t.starts_with("armv6") => Ok("armv6h"),
        Some(t) if t.starts_with("armv7") => Ok("armv7h"),
        Some(t) if t.starts_with("aarch64") => Ok("aarch64"),
        Some(t) => Err(SysrootError::Config(format!("Unsupported ALARM target {}", t))),
    }
}

fn alpine_arch(target: Option<&str>) -> SysrootResult<&'static str> {
    match target {
        None => Err(SysrootError::Config(
            "Alpine target not specified (use --target argument)".to_string(),
        )),
        Some(t) if t.starts_with("aarch64") => Ok("aarch64"),
        Some(t) if t.starts_with("arm") => Ok("armhf"),
        Some(t) => Err(SysrootError::Config(format!("Unsupported Alpine target {}", t))),
    }
}
