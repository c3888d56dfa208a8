//! Native-module enumerator.

use crate::layout::{has_suffix_ignore_case, BundleLayout};
use crate::walk::{walk, Visit, WalkOutcome};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// File-name suffix of native Node add-ons.
pub const NATIVE_MODULE_SUFFIX: &str = ".node";

/// Collect native `.node` modules in traversal order.
///
/// `max_files == 0` means unlimited. Once the cap is reached the current walk
/// stops and the remaining roots are not visited.
pub fn find_node_files(layout: &BundleLayout, max_files: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let capped = |count: usize| max_files > 0 && count >= max_files;

    for root in layout.native_module_roots() {
        if capped(found.len()) {
            break;
        }
        debug!("Searching for .node files in: {}", root.display());

        let outcome = walk(&root, |entry| {
            if !entry.file_type().is_file() || !has_suffix_ignore_case(entry.path(), NATIVE_MODULE_SUFFIX) {
                return Visit::Continue;
            }
            // Overlapping roots report a file once.
            if !seen.insert(entry.path().to_path_buf()) {
                return Visit::Continue;
            }
            debug!("Found .node file: {}", entry.path().display());
            found.push(entry.path().to_path_buf());
            if capped(found.len()) {
                Visit::Stop
            } else {
                Visit::Continue
            }
        });

        if outcome == WalkOutcome::Stopped {
            debug!("Reached maximum of {} .node files", max_files);
            break;
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MacBundle, WindowsApp};
    use asarprobe_common::Platform;
    use pretty_assertions::assert_eq;

    fn mac_bundle_with_modules(parent: &std::path::Path) -> MacBundle {
        MacBundle::new(parent, "Chat.app")
            .file("Contents/Resources/app.asar.unpacked/node_modules/a/build/a.node", b"")
            .file("Contents/Resources/app.asar.unpacked/node_modules/b/b.NODE", b"")
            .file("Contents/Resources/app.asar.unpacked/node_modules/b/index.js", b"")
            .file("Contents/Frameworks/Helper/c.node", b"")
            .file("Contents/Frameworks/Helper/d.node", b"")
    }

    #[test]
    fn test_unlimited_in_traversal_order() {
        let temp = tempfile::tempdir().unwrap();
        let app = mac_bundle_with_modules(temp.path());
        let layout = BundleLayout::new(Platform::MacOs, app.path());

        let found = find_node_files(&layout, 0);
        let base = app.path().join("Contents");
        assert_eq!(
            found,
            vec![
                base.join("Resources/app.asar.unpacked/node_modules/a/build/a.node"),
                base.join("Resources/app.asar.unpacked/node_modules/b/b.NODE"),
                base.join("Frameworks/Helper/c.node"),
                base.join("Frameworks/Helper/d.node"),
            ]
        );
    }

    #[test]
    fn test_cap_stops_before_later_roots() {
        let temp = tempfile::tempdir().unwrap();
        let app = mac_bundle_with_modules(temp.path());
        let layout = BundleLayout::new(Platform::MacOs, app.path());

        let found = find_node_files(&layout, 2);
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|p| p.starts_with(app.path().join("Contents/Resources"))));
    }

    #[test]
    fn test_cap_spanning_roots() {
        let temp = tempfile::tempdir().unwrap();
        let app = mac_bundle_with_modules(temp.path());
        let layout = BundleLayout::new(Platform::MacOs, app.path());

        let found = find_node_files(&layout, 3);
        assert_eq!(found.len(), 3);
        assert_eq!(found[2], app.path().join("Contents/Frameworks/Helper/c.node"));
    }

    #[test]
    fn test_windows_overlapping_roots_do_not_duplicate() {
        let temp = tempfile::tempdir().unwrap();
        let app = WindowsApp::new(temp.path(), "Chat")
            .executable(b"MZ")
            .file("ffmpeg.node", b"")
            .file("resources/app.asar.unpacked/keytar.node", b"");
        let layout = BundleLayout::new(Platform::Windows, app.exe_path());

        let found = find_node_files(&layout, 0);
        assert_eq!(
            found,
            vec![
                app.dir().join("ffmpeg.node"),
                app.dir().join("resources/app.asar.unpacked/keytar.node"),
            ]
        );
    }

    #[test]
    fn test_directories_named_like_modules_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Chat.app").file("Contents/Resources/weird.node/inner.txt", b"");
        let layout = BundleLayout::new(Platform::MacOs, app.path());

        assert!(find_node_files(&layout, 0).is_empty());
    }

    #[test]
    fn test_missing_roots_yield_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let layout = BundleLayout::new(Platform::MacOs, temp.path().join("Gone.app"));
        assert!(find_node_files(&layout, 5).is_empty());
    }
}
