//! Scan settings: YAML file values layered under command-line flags.

use asarprobe_common::{Error, Platform, Result};
use asarprobe_detector::DetectorOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Replaces the platform's default search roots when non-empty.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    #[serde(default)]
    pub node_files: Option<bool>,
    #[serde(default)]
    pub max_node_files: Option<usize>,
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}

/// Values given on the command line; `None` defers to the file or the default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub platform: Option<Platform>,
    pub roots: Vec<PathBuf>,
    pub node_files: Option<bool>,
    pub max_node_files: Option<usize>,
    pub jobs: Option<usize>,
}

/// Effective settings for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// `None` means the running host.
    pub platform: Option<Platform>,
    /// Empty means the platform's default roots.
    pub roots: Vec<PathBuf>,
    pub detector: DetectorOptions,
    pub jobs: usize,
}

impl ScanSettings {
    /// Layer `overrides` over `file` over the built-in defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let defaults = DetectorOptions::default();
        let roots = if overrides.roots.is_empty() {
            file.roots
        } else {
            overrides.roots
        };
        let jobs = overrides.jobs.or(file.jobs).unwrap_or(1);
        if jobs == 0 {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }

        Ok(Self {
            platform: overrides.platform.or(file.platform),
            roots,
            detector: DetectorOptions {
                list_node_files: overrides
                    .node_files
                    .or(file.node_files)
                    .unwrap_or(defaults.list_node_files),
                max_node_files: overrides
                    .max_node_files
                    .or(file.max_node_files)
                    .unwrap_or(defaults.max_node_files),
            },
            jobs,
        })
    }

    /// Platform to scan for, falling back to the running host.
    pub fn platform(&self) -> Result<Platform> {
        match self.platform {
            Some(platform) => Ok(platform),
            None => Platform::host(),
        }
    }
}
