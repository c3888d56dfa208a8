//! Per-bundle inspection pipeline.

use crate::archive::has_archive;
use crate::classifier::classify;
use crate::integrity::check_integrity;
use crate::layout::{BundleCandidate, BundleLayout, BundleShape};
use crate::modules::find_node_files;
use asarprobe_common::Platform;
use asarprobe_schema::ClassificationResult;
use tracing::debug;

/// Tunables for an inspection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorOptions {
    /// Enumerate native `.node` modules of Electron apps.
    pub list_node_files: bool,
    /// Cap on listed modules per app; 0 means unlimited.
    pub max_node_files: usize,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            list_node_files: true,
            max_node_files: 5,
        }
    }
}

/// Runs classification, archive, integrity and module checks for a platform.
///
/// Holds no state between candidates, so one detector can be shared across
/// worker threads.
#[derive(Debug, Clone, Copy)]
pub struct Detector {
    platform: Platform,
    options: DetectorOptions,
}

impl Detector {
    pub fn new(platform: Platform, options: DetectorOptions) -> Self {
        Self { platform, options }
    }

    /// Inspect one candidate. Never fails: unreadable files degrade the
    /// affected signal and an unreadable evidence file is reported on the
    /// result.
    pub fn inspect(&self, candidate: &BundleCandidate) -> ClassificationResult {
        let path = candidate.path().display().to_string();
        if candidate.shape() != BundleShape::for_platform(self.platform) {
            debug!("{} is not a {} bundle", path, self.platform);
            return ClassificationResult::not_electron(path);
        }
        let layout = BundleLayout::new(self.platform, candidate.path());

        let classification = classify(&layout);
        if !classification.is_electron {
            debug!("{} is not an Electron app", path);
            return ClassificationResult::not_electron(path);
        }
        if let Some(rule) = classification.rule {
            debug!("{} identified as Electron by {}", path, rule);
        }

        let result = if has_archive(&layout) {
            let verdict = check_integrity(&layout);
            ClassificationResult::with_archive(path, classification.version, verdict)
        } else {
            debug!("{} has no app.asar file", path);
            ClassificationResult::without_archive(path, classification.version)
        };

        if !self.options.list_node_files {
            return result;
        }
        let node_files = find_node_files(&layout, self.options.max_node_files)
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();
        result.with_node_files(node_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MacBundle, WindowsApp};
    use crate::integrity::MISSING_SUBKEYS_WARNING;
    use asarprobe_schema::{FeatureState, UNKNOWN_VERSION};
    use pretty_assertions::assert_eq;

    fn mac(path: &std::path::Path) -> BundleCandidate {
        BundleCandidate::new(path, BundleShape::Directory)
    }

    fn detector(platform: Platform) -> Detector {
        Detector::new(platform, DetectorOptions::default())
    }

    #[test]
    fn test_framework_without_archive() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Slack.app")
            .plist("<key>ElectronVersion</key>\n<string>27.0.2</string>")
            .framework();

        let result = detector(Platform::MacOs).inspect(&mac(app.path()));
        assert!(result.is_electron());
        assert_eq!(result.version(), "27.0.2");
        assert!(!result.has_asar_file());
        assert_eq!(result.asar_integrity(), FeatureState::NotApplicable);
        assert_eq!(result.only_load_from_asar(), FeatureState::NotApplicable);
        assert!(result.integrity_error().is_none());
    }

    #[test]
    fn test_framework_with_archive_and_bare_integrity_key() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Slack.app")
            .plist("<key>ElectronVersion</key>\n<string>27.0.2</string>\n<key>ElectronAsarIntegrity</key>\n<dict/>")
            .framework()
            .archive();

        let result = detector(Platform::MacOs).inspect(&mac(app.path()));
        assert!(result.has_asar_file());
        assert_eq!(result.asar_integrity(), FeatureState::Enabled);
        assert_eq!(result.only_load_from_asar(), FeatureState::Disabled);
        assert_eq!(result.warnings(), [MISSING_SUBKEYS_WARNING.to_string()]);
    }

    #[test]
    fn test_windows_score_scenarios() {
        let temp = tempfile::tempdir().unwrap();
        let enabled = WindowsApp::new(temp.path(), "Enabled")
            .executable(b"MZ...sha256...Integrity...")
            .archive();
        let disabled = WindowsApp::new(temp.path(), "Disabled")
            .executable(b"MZ...sha256...")
            .archive();

        let detector = detector(Platform::Windows);
        let result = detector.inspect(&BundleCandidate::new(enabled.exe_path(), BundleShape::Executable));
        assert_eq!(result.asar_integrity(), FeatureState::Enabled);
        assert_eq!(result.version(), UNKNOWN_VERSION);

        let result = detector.inspect(&BundleCandidate::new(disabled.exe_path(), BundleShape::Executable));
        assert_eq!(result.asar_integrity(), FeatureState::Disabled);
    }

    #[test]
    fn test_not_electron_has_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Notes.app")
            .plist("<key>CFBundleVersion</key><string>4.9</string>")
            .file("Contents/Resources/helper.node", b"");

        let result = detector(Platform::MacOs).inspect(&mac(app.path()));
        assert_eq!(result, ClassificationResult::not_electron(app.path().display().to_string()));
        assert!(result.node_files().is_empty());
    }

    #[test]
    fn test_candidate_shape_must_match_platform() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Slack.app")
            .plist("<key>ElectronVersion</key>\n<string>27.0.2</string>")
            .framework()
            .archive();

        let as_executable = BundleCandidate::new(app.path(), BundleShape::Executable);
        let result = detector(Platform::MacOs).inspect(&as_executable);
        assert_eq!(result, ClassificationResult::not_electron(app.path().display().to_string()));

        let chat = WindowsApp::new(temp.path(), "Chat").executable(b"MZ").archive();
        let as_directory = BundleCandidate::new(chat.dir(), BundleShape::Directory);
        assert!(!detector(Platform::Windows).inspect(&as_directory).is_electron());
        assert!(detector(Platform::MacOs).inspect(&mac(app.path())).is_electron());
    }

    #[test]
    fn test_node_files_listed_and_capped() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Chat.app")
            .plist("")
            .archive()
            .file("Contents/Resources/a.node", b"")
            .file("Contents/Resources/b.node", b"")
            .file("Contents/Resources/c.node", b"");

        let options = DetectorOptions {
            list_node_files: true,
            max_node_files: 2,
        };
        let result = Detector::new(Platform::MacOs, options).inspect(&mac(app.path()));
        assert_eq!(result.node_files().len(), 2);

        let options = DetectorOptions {
            list_node_files: false,
            max_node_files: 0,
        };
        let result = Detector::new(Platform::MacOs, options).inspect(&mac(app.path()));
        assert!(result.node_files().is_empty());
    }

    #[test]
    fn test_inspection_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let app = MacBundle::new(temp.path(), "Chat.app")
            .plist("<key>ElectronAsarIntegrity</key><dict><key>hash</key><key>algorithm</key></dict>")
            .archive()
            .package_json(r#"{"dependencies": {"electron": "26.0.0"}}"#)
            .executable(b"OnlyLoadAppFromAsar")
            .file("Contents/Resources/x.node", b"");

        let detector = detector(Platform::MacOs);
        let first = detector.inspect(&mac(app.path()));
        let second = detector.inspect(&mac(app.path()));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
