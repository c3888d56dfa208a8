//! Platform definitions.
//!
//! A [`Platform`] decides the shape of an application bundle and where its
//! metadata, executable and archive live. Only macOS and Windows ship
//! Electron bundles in a layout this tool understands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform whose bundle conventions are applied during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// `.app` directory bundles with an `Info.plist`.
    #[serde(alias = "darwin")]
    MacOs,
    /// An `.exe` next to a `resources` directory.
    Windows,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" | "mac" => Ok(Platform::MacOs),
            "windows" | "win" => Ok(Platform::Windows),
            _ => Err(crate::Error::UnsupportedOs(s.to_string())),
        }
    }
}

impl Platform {
    /// Resolve the platform of the running host.
    ///
    /// This is the only place an unsupported operating system is reported.
    pub fn host() -> crate::Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> crate::Result<Self> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            other => Err(crate::Error::UnsupportedOs(other.to_string())),
        }
    }

    /// Check if the platform is macOS.
    pub fn is_macos(&self) -> bool {
        matches!(self, Platform::MacOs)
    }
}
