//! Regex patterns for pulling an Electron version out of raw bytes.
//!
//! Patterns run as `regex::bytes` so plists, JSON manifests and compiled
//! executables can all be searched without decoding them first.

use regex::bytes::Regex;
use std::sync::LazyLock;

/// Explicit `ElectronVersion` key in an `Info.plist`.
pub static PLIST_ELECTRON_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<key>ElectronVersion</key>\s*<string>([0-9.]+)").unwrap()
});

/// Generic `CFBundleVersion` key in an `Info.plist`.
pub static PLIST_BUNDLE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<key>CFBundleVersion</key>\s*<string>([0-9.]+)").unwrap()
});

/// `Electron/X.Y.Z` as found in user-agent strings baked into the binary.
pub static ELECTRON_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Electron/([0-9.]+)").unwrap());

/// `electron@X.Y.Z` package specifier.
pub static ELECTRON_PACKAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"electron@([0-9.]+)").unwrap());

/// `electron": "<version>"` JSON-style key.
pub static JSON_ELECTRON_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"electron": "([^"]+)""#).unwrap());

/// `"electronVersion": "<version>"` JSON-style key.
pub static JSON_ELECTRON_VERSION_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""electronVersion": "([^"]+)""#).unwrap());

/// `"electron": "<version>"` in a package manifest, any spacing.
pub static PACKAGE_ELECTRON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""electron":\s*"([^"]+)""#).unwrap());

/// `"electronVersion": "<version>"` in a package manifest, any spacing.
pub static PACKAGE_ELECTRON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""electronVersion":\s*"([^"]+)""#).unwrap());

static PLIST_BUNDLE_EXECUTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<key>CFBundleExecutable</key>\s*<string>([^<]+)</string>").unwrap()
});

/// The version pattern family, strongest first.
pub fn version_patterns() -> [&'static Regex; 6] {
    [
        &PLIST_ELECTRON_VERSION,
        &PLIST_BUNDLE_VERSION,
        &ELECTRON_TOKEN,
        &ELECTRON_PACKAGE_REF,
        &JSON_ELECTRON_KEY,
        &JSON_ELECTRON_VERSION_KEY,
    ]
}

/// Return the first non-empty capture of the first pattern that matches.
pub fn first_capture(patterns: &[&Regex], content: &[u8]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Search `content` with the whole version family.
pub fn find_version(content: &[u8]) -> Option<String> {
    first_capture(&version_patterns(), content)
}

/// Executable name declared by an `Info.plist`.
pub fn bundle_executable(content: &[u8]) -> Option<String> {
    first_capture(&[&PLIST_BUNDLE_EXECUTABLE], content)
}
