//! Error-tolerant directory traversal driven by a visitor.

use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// What the traversal should do after visiting an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// Do not descend into the visited directory. Same as `Continue` for files.
    SkipSubtree,
    /// End the traversal.
    Stop,
}

/// How a traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    Stopped,
}

/// Depth-first, name-sorted traversal that never follows symlinks.
///
/// Unreadable entries are logged and dropped; their siblings are still
/// visited.
pub struct Walk {
    entries: walkdir::IntoIter,
}

impl Walk {
    pub fn new(root: &Path) -> Self {
        Self {
            entries: WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
        }
    }

    /// Next readable entry.
    pub fn next_entry(&mut self) -> Option<DirEntry> {
        loop {
            match self.entries.next()? {
                Ok(entry) => return Some(entry),
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    debug!("Error accessing path {}: {}", path, e);
                }
            }
        }
    }

    /// Apply a visitor decision to the entry just returned.
    pub fn apply(&mut self, entry: &DirEntry, visit: Visit) {
        if visit == Visit::SkipSubtree && entry.file_type().is_dir() {
            self.entries.skip_current_dir();
        }
    }
}

/// Visit every entry under `root` until the visitor says stop.
pub fn walk<F>(root: &Path, mut visitor: F) -> WalkOutcome
where
    F: FnMut(&DirEntry) -> Visit,
{
    let mut walk = Walk::new(root);
    while let Some(entry) = walk.next_entry() {
        match visitor(&entry) {
            Visit::Stop => return WalkOutcome::Stopped,
            visit => walk.apply(&entry, visit),
        }
    }
    WalkOutcome::Completed
}
