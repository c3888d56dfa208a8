//! Bundle candidates and the per-platform paths inside them.

use crate::patterns;
use asarprobe_common::Platform;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the packed application archive.
pub const APP_ARCHIVE: &str = "app.asar";
/// Name of the archive holding Electron's own JavaScript.
pub const RUNTIME_ARCHIVE: &str = "electron.asar";
/// Directory name of the embedded Electron framework on macOS.
pub const ELECTRON_FRAMEWORK: &str = "Electron Framework.framework";

/// Shape of an installed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleShape {
    /// A `.app` directory.
    Directory,
    /// An executable next to a `resources` directory.
    Executable,
}

impl BundleShape {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::MacOs => BundleShape::Directory,
            Platform::Windows => BundleShape::Executable,
        }
    }
}

/// A path believed to be one installed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleCandidate {
    path: PathBuf,
    shape: BundleShape,
}

impl BundleCandidate {
    pub fn new(path: impl Into<PathBuf>, shape: BundleShape) -> Self {
        Self {
            path: path.into(),
            shape,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shape(&self) -> BundleShape {
        self.shape
    }
}

/// Resolves where metadata, executable and archives live for a candidate.
#[derive(Debug, Clone)]
pub struct BundleLayout {
    platform: Platform,
    root: PathBuf,
}

impl BundleLayout {
    pub fn new(platform: Platform, root: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            root: root.into(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name of the candidate, lossily decoded.
    pub fn bundle_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn contents(&self) -> PathBuf {
        self.root.join("Contents")
    }

    /// `Info.plist` of a macOS bundle. Windows bundles carry no metadata file.
    pub fn metadata_path(&self) -> Option<PathBuf> {
        match self.platform {
            Platform::MacOs => Some(self.contents().join("Info.plist")),
            Platform::Windows => None,
        }
    }

    /// The embedded Electron framework directory (macOS only).
    pub fn framework_path(&self) -> Option<PathBuf> {
        match self.platform {
            Platform::MacOs => Some(self.contents().join("Frameworks").join(ELECTRON_FRAMEWORK)),
            Platform::Windows => None,
        }
    }

    /// `Info.plist` of the embedded framework.
    pub fn framework_metadata_path(&self) -> Option<PathBuf> {
        self.framework_path()
            .map(|framework| framework.join("Resources").join("Info.plist"))
    }

    /// The Windows executable: the candidate itself when it ends in `.exe`,
    /// otherwise `<candidate>/<name>.exe`.
    fn windows_executable(&self) -> PathBuf {
        if has_suffix_ignore_case(&self.root, ".exe") {
            self.root.clone()
        } else {
            self.root.join(format!("{}.exe", self.bundle_name()))
        }
    }

    /// Main executable derived from the bundle name.
    ///
    /// On macOS this is `Contents/MacOS/<name without .app>`; see
    /// [`BundleLayout::resolve_executable`] for the metadata-aware lookup.
    pub fn executable_path(&self) -> PathBuf {
        match self.platform {
            Platform::MacOs => {
                let name = self.bundle_name();
                let stem = name.strip_suffix(".app").unwrap_or(&name);
                self.contents().join("MacOS").join(stem)
            }
            Platform::Windows => self.windows_executable(),
        }
    }

    /// Main executable, preferring `CFBundleExecutable` from the metadata when
    /// it names an existing file.
    pub fn resolve_executable(&self, metadata: Option<&[u8]>) -> PathBuf {
        if self.platform.is_macos() {
            if let Some(declared) = metadata.and_then(patterns::bundle_executable) {
                let path = self.contents().join("MacOS").join(&declared);
                if path.is_file() {
                    return path;
                }
                debug!("  CFBundleExecutable {} not found, using bundle name", declared);
            }
        }
        self.executable_path()
    }

    /// Directory that holds the archives.
    pub fn resources_dir(&self) -> PathBuf {
        match self.platform {
            Platform::MacOs => self.contents().join("Resources"),
            Platform::Windows => self.executable_dir().join("resources"),
        }
    }

    /// Directory containing the Windows executable.
    fn executable_dir(&self) -> PathBuf {
        let exe = self.windows_executable();
        exe.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    pub fn archive_path(&self) -> PathBuf {
        self.resources_dir().join(APP_ARCHIVE)
    }

    pub fn runtime_archive_path(&self) -> PathBuf {
        self.resources_dir().join(RUNTIME_ARCHIVE)
    }

    /// `package.json` of an unpacked app directory beside the archive.
    pub fn package_manifest_path(&self) -> PathBuf {
        self.resources_dir().join("app").join("package.json")
    }

    /// Subtrees searched for native `.node` modules, in search order.
    pub fn native_module_roots(&self) -> Vec<PathBuf> {
        match self.platform {
            Platform::MacOs => vec![
                self.contents().join("Resources"),
                self.contents().join("Frameworks"),
            ],
            Platform::Windows => {
                let dir = self.executable_dir();
                let resources = dir.join("resources");
                vec![dir, resources]
            }
        }
    }
}

/// Case-insensitive file-name suffix check.
pub(crate) fn has_suffix_ignore_case(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(suffix))
        .unwrap_or(false)
}

/// Read a whole file, treating any failure as absence.
pub(crate) fn read_optional(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("  Could not read {}: {}", path.display(), e);
            None
        }
    }
}
