//! Bundle locator: lazily yields candidate application bundles.

use crate::layout::{has_suffix_ignore_case, BundleCandidate, BundleShape};
use crate::walk::{Visit, Walk};
use asarprobe_common::{Error, Platform, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::DirEntry;

/// Conventional application directories for a platform.
///
/// Directories that cannot be resolved (no home directory, unset environment
/// variable) are left out.
pub fn default_roots(platform: Platform) -> Vec<PathBuf> {
    match platform {
        Platform::MacOs => {
            let mut roots = vec![PathBuf::from("/Applications")];
            if let Some(home) = dirs::home_dir() {
                roots.push(home.join("Applications"));
            }
            roots
        }
        Platform::Windows => {
            let env_dir = |name: &str| {
                std::env::var_os(name)
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            };
            let mut roots = Vec::new();
            roots.extend(env_dir("ProgramFiles"));
            roots.extend(env_dir("ProgramFiles(x86)"));
            roots.extend(env_dir("LOCALAPPDATA").map(|p| p.join("Programs")));
            roots
        }
    }
}

/// Finite, non-restartable iterator over candidate bundles.
///
/// Roots are walked in order, each depth-first with entries sorted by name.
pub struct Locator {
    platform: Platform,
    roots: VecDeque<PathBuf>,
    current: Option<Walk>,
}

impl Locator {
    /// Locate bundles under the platform's conventional directories.
    pub fn new(platform: Platform) -> Self {
        Self::with_roots(platform, default_roots(platform))
    }

    /// Locate bundles under the given roots. Missing roots are skipped.
    pub fn with_roots(platform: Platform, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            platform,
            roots: roots.into_iter().collect(),
            current: None,
        }
    }

    /// Like [`Locator::with_roots`], but every root must be an existing directory.
    ///
    /// Used for roots named by the operator, where a typo should fail the
    /// scan instead of silently producing an empty report.
    pub fn explicit(platform: Platform, roots: Vec<PathBuf>) -> Result<Self> {
        for root in &roots {
            if !root.is_dir() {
                return Err(Error::ScanRoot {
                    root: root.display().to_string(),
                    reason: "not a directory".to_string(),
                });
            }
        }
        Ok(Self::with_roots(platform, roots))
    }

    fn next_root(&mut self) -> Option<Walk> {
        while let Some(root) = self.roots.pop_front() {
            if !root.is_dir() {
                debug!("Directory does not exist: {}", root.display());
                continue;
            }
            info!("Scanning directory: {}", root.display());
            return Some(Walk::new(&root));
        }
        None
    }

    /// Decide whether `entry` is a candidate and how traversal proceeds.
    fn visit_entry(&self, entry: &DirEntry) -> (Visit, Option<BundleCandidate>) {
        let file_type = entry.file_type();
        match self.platform {
            Platform::MacOs => {
                if file_type.is_dir() && entry.file_name().to_string_lossy().ends_with(".app") {
                    debug!("Found app bundle: {}", entry.path().display());
                    let candidate = BundleCandidate::new(entry.path(), BundleShape::Directory);
                    // Bundles do not nest.
                    return (Visit::SkipSubtree, Some(candidate));
                }
                (Visit::Continue, None)
            }
            Platform::Windows => {
                if file_type.is_file()
                    && has_suffix_ignore_case(entry.path(), ".exe")
                    && has_sibling_resources(entry.path())
                {
                    debug!("Found potential Electron app: {}", entry.path().display());
                    let candidate = BundleCandidate::new(entry.path(), BundleShape::Executable);
                    return (Visit::Continue, Some(candidate));
                }
                (Visit::Continue, None)
            }
        }
    }
}

fn has_sibling_resources(exe: &Path) -> bool {
    exe.parent()
        .map(|dir| dir.join("resources").is_dir())
        .unwrap_or(false)
}

impl Iterator for Locator {
    type Item = BundleCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                self.current = Some(self.next_root()?);
            }
            let walk = self.current.as_mut()?;

            let Some(entry) = walk.next_entry() else {
                self.current = None;
                continue;
            };

            let (visit, candidate) = self.visit_entry(&entry);
            if let Some(walk) = self.current.as_mut() {
                walk.apply(&entry, visit);
            }
            if candidate.is_some() {
                return candidate;
            }
        }
    }
}
