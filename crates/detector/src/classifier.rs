//! Runtime classifier: is a candidate built on Electron, and which version?
//!
//! Rules are tried from strongest to weakest evidence and the first one that
//! fires decides. Any file that cannot be read only weakens the version
//! lookup; it never fails the classification.

use crate::layout::{read_optional, BundleLayout};
use crate::patterns;
use asarprobe_common::Platform;
use asarprobe_schema::UNKNOWN_VERSION;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Dependency tables in a `package.json` that may declare `electron`.
const DEPENDENCY_TABLES: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "peerDependencies",
];

/// Which detection rule identified the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionRule {
    /// The embedded `Electron Framework.framework`.
    Framework,
    /// The packed `app.asar`.
    AppArchive,
    /// Electron's own `electron.asar`.
    RuntimeArchive,
}

impl fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionRule::Framework => write!(f, "electron framework"),
            DetectionRule::AppArchive => write!(f, "app.asar"),
            DetectionRule::RuntimeArchive => write!(f, "electron.asar"),
        }
    }
}

/// Classifier output for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_electron: bool,
    /// Empty when not Electron, `"unknown"` when unresolved.
    pub version: String,
    pub rule: Option<DetectionRule>,
}

impl Classification {
    pub fn negative() -> Self {
        Self {
            is_electron: false,
            version: String::new(),
            rule: None,
        }
    }

    fn positive(rule: DetectionRule, version: Option<String>) -> Self {
        Self {
            is_electron: true,
            version: version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            rule: Some(rule),
        }
    }
}

/// Classify the candidate described by `layout`.
pub fn classify(layout: &BundleLayout) -> Classification {
    debug!("Checking if {} is an Electron app...", layout.root().display());
    match layout.platform() {
        Platform::MacOs => classify_macos(layout),
        Platform::Windows => classify_windows(layout),
    }
}

fn classify_macos(layout: &BundleLayout) -> Classification {
    if !layout.bundle_name().ends_with(".app") {
        debug!("  Not an app bundle: {}", layout.root().display());
        return Classification::negative();
    }

    let Some(plist_path) = layout.metadata_path().filter(|p| p.is_file()) else {
        debug!("  No Info.plist found in {}", layout.root().display());
        return Classification::negative();
    };

    if let Some(framework) = layout.framework_path().filter(|p| p.exists()) {
        debug!("  Found Electron Framework: {}", framework.display());
        let version = read_optional(&plist_path)
            .and_then(|plist| patterns::find_version(&plist))
            .or_else(|| {
                layout
                    .framework_metadata_path()
                    .and_then(|p| read_optional(&p))
                    .and_then(|plist| patterns::find_version(&plist))
            });
        log_version(version.as_deref());
        return Classification::positive(DetectionRule::Framework, version);
    }

    let plist = read_optional(&plist_path);
    classify_archives(layout, || read_optional(&layout.resolve_executable(plist.as_deref())))
}

fn classify_windows(layout: &BundleLayout) -> Classification {
    let exe = layout.executable_path();
    if !exe.is_file() {
        debug!("  No executable found: {}", exe.display());
        return Classification::negative();
    }

    let resources = layout.resources_dir();
    if !resources.is_dir() {
        debug!("  No resources directory found: {}", resources.display());
        return Classification::negative();
    }

    classify_archives(layout, || read_optional(&exe))
}

/// Archive rules shared by both platforms. `read_executable` is only called
/// when the executable is actually needed.
fn classify_archives<F>(layout: &BundleLayout, read_executable: F) -> Classification
where
    F: FnOnce() -> Option<Vec<u8>>,
{
    let archive = layout.archive_path();
    if archive.exists() {
        debug!("  Found app.asar: {}", archive.display());
        let manifest = layout.package_manifest_path();
        let version = if manifest.is_file() {
            debug!("  Found package.json, checking for Electron version");
            read_optional(&manifest).and_then(|content| version_from_package_manifest(&content))
        } else {
            read_executable().and_then(|exe| patterns::find_version(&exe))
        };
        log_version(version.as_deref());
        return Classification::positive(DetectionRule::AppArchive, version);
    }

    let runtime_archive = layout.runtime_archive_path();
    if runtime_archive.exists() {
        debug!("  Found electron.asar: {}", runtime_archive.display());
        let version = read_executable().and_then(|exe| patterns::find_version(&exe));
        log_version(version.as_deref());
        return Classification::positive(DetectionRule::RuntimeArchive, version);
    }

    Classification::negative()
}

/// Electron version declared by a `package.json`.
///
/// The `electron` dependency wins over an `electronVersion` key. Manifests that
/// do not parse as JSON are searched textually.
pub fn version_from_package_manifest(content: &[u8]) -> Option<String> {
    if let Ok(manifest) = serde_json::from_slice::<Value>(content) {
        let declared = DEPENDENCY_TABLES
            .iter()
            .find_map(|table| non_empty_str(&manifest[*table]["electron"]))
            .or_else(|| non_empty_str(&manifest["electronVersion"]))
            .or_else(|| non_empty_str(&manifest["build"]["electronVersion"]));
        if declared.is_some() {
            return declared;
        }
    }

    patterns::first_capture(
        &[&patterns::PACKAGE_ELECTRON, &patterns::PACKAGE_ELECTRON_VERSION],
        content,
    )
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn log_version(version: Option<&str>) {
    match version {
        Some(v) => debug!("  Found Electron version: {}", v),
        None => debug!("  Electron version unresolved"),
    }
}
