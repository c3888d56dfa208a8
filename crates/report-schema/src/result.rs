//! Per-bundle classification record.

use crate::evidence::EvidenceHit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an archive-dependent feature.
///
/// Features that only exist when an `app.asar` is shipped are reported as
/// `NotApplicable` when there is no archive, so that "absent" is never read as
/// "disabled".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureState {
    Enabled,
    Disabled,
    #[default]
    NotApplicable,
}

impl FeatureState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            FeatureState::Enabled
        } else {
            FeatureState::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, FeatureState::Enabled)
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, FeatureState::NotApplicable)
    }

    /// Short table label.
    pub fn label(&self) -> &'static str {
        match self {
            FeatureState::Enabled => "Yes",
            FeatureState::Disabled => "No",
            FeatureState::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for FeatureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureState::Enabled => write!(f, "true"),
            FeatureState::Disabled => write!(f, "false"),
            FeatureState::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Whether a renderer should list a record in detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Detail,
    /// Counted in aggregates only.
    Skip,
}

/// Outcome of the integrity evidence aggregation for a bundle with an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityVerdict {
    pub asar_integrity: bool,
    pub only_load_from_asar: bool,
    /// Set when the primary evidence file could not be read at all.
    pub error: Option<String>,
    /// Non-fatal diagnostics that did not change a verdict.
    pub warnings: Vec<String>,
    pub evidence: Vec<EvidenceHit>,
}

impl IntegrityVerdict {
    /// Verdict for a bundle whose primary evidence file is unreadable.
    pub fn unreadable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Immutable classification snapshot for one candidate bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    path: String,
    is_electron: bool,
    #[serde(rename = "electron_version", default, skip_serializing_if = "String::is_empty")]
    version: String,
    has_asar_file: bool,
    #[serde(rename = "asar_integrity_enabled", default)]
    asar_integrity: FeatureState,
    #[serde(default)]
    only_load_from_asar: FeatureState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    node_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    integrity_error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    evidence: Vec<EvidenceHit>,
}

impl ClassificationResult {
    /// Record for a candidate that is not an Electron application.
    pub fn not_electron(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_electron: false,
            version: String::new(),
            has_asar_file: false,
            asar_integrity: FeatureState::NotApplicable,
            only_load_from_asar: FeatureState::NotApplicable,
            node_files: Vec::new(),
            integrity_error: None,
            warnings: Vec::new(),
            evidence: Vec::new(),
        }
    }

    /// Record for an Electron application that ships no `app.asar`.
    pub fn without_archive(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            is_electron: true,
            version: version.into(),
            ..Self::not_electron(path)
        }
    }

    /// Record for an Electron application with an `app.asar` and a verdict.
    pub fn with_archive(
        path: impl Into<String>,
        version: impl Into<String>,
        verdict: IntegrityVerdict,
    ) -> Self {
        Self {
            has_asar_file: true,
            asar_integrity: FeatureState::from_enabled(verdict.asar_integrity),
            only_load_from_asar: FeatureState::from_enabled(verdict.only_load_from_asar),
            integrity_error: verdict.error,
            warnings: verdict.warnings,
            evidence: verdict.evidence,
            ..Self::without_archive(path, version)
        }
    }

    /// Attach the native modules found in the bundle. Ignored for non-Electron records.
    pub fn with_node_files(mut self, node_files: Vec<String>) -> Self {
        if self.is_electron {
            self.node_files = node_files;
        }
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_electron(&self) -> bool {
        self.is_electron
    }

    /// Best-effort Electron version; `"unknown"` when unresolved, empty when not Electron.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn has_asar_file(&self) -> bool {
        self.has_asar_file
    }

    pub fn asar_integrity(&self) -> FeatureState {
        self.asar_integrity
    }

    pub fn only_load_from_asar(&self) -> FeatureState {
        self.only_load_from_asar
    }

    pub fn node_files(&self) -> &[String] {
        &self.node_files
    }

    pub fn integrity_error(&self) -> Option<&str> {
        self.integrity_error.as_deref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn evidence(&self) -> &[EvidenceHit] {
        &self.evidence
    }

    pub fn disposition(&self) -> Disposition {
        if self.is_electron {
            Disposition::Detail
        } else {
            Disposition::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{EvidenceSource, Signal};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_not_electron_defaults() {
        let result = ClassificationResult::not_electron("/Applications/Notes.app");
        assert!(!result.is_electron());
        assert_eq!(result.version(), "");
        assert!(!result.has_asar_file());
        assert_eq!(result.asar_integrity(), FeatureState::NotApplicable);
        assert_eq!(result.only_load_from_asar(), FeatureState::NotApplicable);
        assert_eq!(result.disposition(), Disposition::Skip);
    }

    #[test]
    fn test_without_archive_is_not_applicable() {
        let result = ClassificationResult::without_archive("/Applications/Slack.app", "27.0.2");
        assert!(result.is_electron());
        assert_eq!(result.version(), "27.0.2");
        assert_eq!(result.asar_integrity(), FeatureState::NotApplicable);
        assert_eq!(result.only_load_from_asar(), FeatureState::NotApplicable);
        assert_eq!(result.disposition(), Disposition::Detail);
    }

    #[test]
    fn test_with_archive_maps_verdict() {
        let verdict = IntegrityVerdict {
            asar_integrity: true,
            only_load_from_asar: false,
            error: None,
            warnings: vec!["hash missing".to_string()],
            evidence: vec![EvidenceHit::new(
                Signal::AsarIntegrity,
                EvidenceSource::Metadata,
                "ElectronAsarIntegrity",
                2,
            )],
        };
        let result = ClassificationResult::with_archive("/Applications/Slack.app", "unknown", verdict);
        assert!(result.has_asar_file());
        assert_eq!(result.asar_integrity(), FeatureState::Enabled);
        assert_eq!(result.only_load_from_asar(), FeatureState::Disabled);
        assert_eq!(result.warnings(), ["hash missing".to_string()]);
        assert_eq!(result.evidence().len(), 1);
    }

    #[test]
    fn test_node_files_ignored_for_non_electron() {
        let result = ClassificationResult::not_electron("/x").with_node_files(vec!["a.node".into()]);
        assert!(result.node_files().is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let result = ClassificationResult::with_archive(
            "C:\\Program Files\\App\\App.exe",
            "28.1.0",
            IntegrityVerdict::unreadable("error reading executable: denied"),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["is_electron"], true);
        assert_eq!(value["electron_version"], "28.1.0");
        assert_eq!(value["asar_integrity_enabled"], "disabled");
        assert_eq!(value["only_load_from_asar"], "disabled");
        assert_eq!(value["integrity_error"], "error reading executable: denied");
        assert!(value.get("node_files").is_none());

        let skipped = serde_json::to_value(ClassificationResult::not_electron("/x")).unwrap();
        assert!(skipped.get("electron_version").is_none());
        assert_eq!(skipped["asar_integrity_enabled"], "not_applicable");
    }

    #[test]
    fn test_feature_state_labels() {
        assert_eq!(FeatureState::Enabled.label(), "Yes");
        assert_eq!(FeatureState::Disabled.label(), "No");
        assert_eq!(FeatureState::NotApplicable.label(), "N/A");
        assert!(!FeatureState::NotApplicable.is_applicable());
    }
}
