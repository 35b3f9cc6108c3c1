use crate::core::path::config_file;
use crate::core::{SysrootError, SysrootResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Mirror locations and default releases for every supported distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Raspberry Pi Foundation archive (firmware and userland packages)
    #[serde(default = "default_raspbian_archive")]
    pub raspbian_archive: String,

    /// Raspbian main archive
    #[serde(default = "default_raspbian_main")]
    pub raspbian_main: String,

    /// Raspbian codename used when no version is given
    #[serde(default = "default_raspbian_version")]
    pub raspbian_version: String,

    /// Ubuntu ports archive
    #[serde(default = "default_ubuntu_main")]
    pub ubuntu_main: String,

    /// Ubuntu Raspberry Pi PPA
    #[serde(default = "default_ubuntu_rpi")]
    pub ubuntu_rpi: String,

    /// Sections read from the Ubuntu ports archive
    #[serde(default = "default_ubuntu_sections")]
    pub ubuntu_sections: Vec<String>,

    /// Ubuntu codename used when no version is given
    #[serde(default = "default_ubuntu_version")]
    pub ubuntu_version: String,

    /// Arch Linux ARM mirror
    #[serde(default = "default_alarm_mirror")]
    pub alarm_mirror: String,

    /// Arch Linux ARM repositories, read in order
    #[serde(default = "default_alarm_repos")]
    pub alarm_repos: Vec<String>,

    /// Alpine CDN mirror
    #[serde(default = "default_alpine_mirror")]
    pub alpine_mirror: String,

    /// Alpine repositories, read in order
    #[serde(default = "default_alpine_repos")]
    pub alpine_repos: Vec<String>,

    /// Alpine release used when no version is given
    #[serde(default = "default_alpine_version")]
    pub alpine_version: String,
}

fn default_raspbian_archive() -> String {
    "http://archive.raspberrypi.org/debian".to_string()
}

fn default_raspbian_main() -> String {
    "http://raspbian.raspberrypi.org/raspbian".to_string()
}

fn default_raspbian_version() -> String {
    "buster".to_string()
}

fn default_ubuntu_main() -> String {
    "http://ports.ubuntu.com/ubuntu-ports".to_string()
}

fn default_ubuntu_rpi() -> String {
    "http://ppa.launchpad.net/ubuntu-raspi2/ppa/ubuntu".to_string()
}

fn default_ubuntu_sections() -> Vec<String> {
    vec!["main".to_string(), "universe".to_string()]
}

fn default_ubuntu_version() -> String {
    "bionic".to_string()
}

fn default_alarm_mirror() -> String {
    "http://mirror.archlinuxarm.org".to_string()
}

fn default_alarm_repos() -> Vec<String> {
    ["alarm", "core", "extra", "community"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_alpine_mirror() -> String {
    "http://dl-cdn.alpinelinux.org/alpine".to_string()
}

fn default_alpine_repos() -> Vec<String> {
    vec!["main".to_string()]
}

fn default_alpine_version() -> String {
    "3.12".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raspbian_archive: default_raspbian_archive(),
            raspbian_main: default_raspbian_main(),
            raspbian_version: default_raspbian_version(),
            ubuntu_main: default_ubuntu_main(),
            ubuntu_rpi: default_ubuntu_rpi(),
            ubuntu_sections: default_ubuntu_sections(),
            ubuntu_version: default_ubuntu_version(),
            alarm_mirror: default_alarm_mirror(),
            alarm_repos: default_alarm_repos(),
            alpine_mirror: default_alpine_mirror(),
            alpine_repos: default_alpine_repos(),
            alpine_version: default_alpine_version(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory
    ///
    /// Config locations:
    /// - `$SYSROOT_CONFIG` if set
    /// - Linux: ~/.config/sysroot/config.yaml
    /// - macOS: ~/Library/Application Support/sysroot/config.yaml
    ///
    /// A missing file yields the built-in defaults.
    pub fn load() -> SysrootResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, falling back to defaults if absent
    pub fn load_from(path: &Path) -> SysrootResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            SysrootError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

}
