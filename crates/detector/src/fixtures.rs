//! Synthetic bundle builders for tests.

use std::fs;
use std::path::{Path, PathBuf};

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn plist_document(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict>\n{}\n</dict>\n</plist>\n",
        body
    )
}

/// A `.app` directory bundle.
pub struct MacBundle {
    path: PathBuf,
}

impl MacBundle {
    pub fn new(parent: &Path, name: &str) -> Self {
        let path = parent.join(name);
        fs::create_dir_all(path.join("Contents")).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stem(&self) -> String {
        let name = self.path.file_name().unwrap().to_string_lossy().to_string();
        name.trim_end_matches(".app").to_string()
    }

    pub fn file(self, relative: &str, content: &[u8]) -> Self {
        write(&self.path.join(relative), content);
        self
    }

    /// Write `Contents/Info.plist` with `body` inside the top-level dict.
    pub fn plist(self, body: &str) -> Self {
        let doc = plist_document(body);
        self.file("Contents/Info.plist", doc.as_bytes())
    }

    pub fn framework(self) -> Self {
        fs::create_dir_all(
            self.path
                .join("Contents/Frameworks/Electron Framework.framework"),
        )
        .unwrap();
        self
    }

    pub fn framework_plist(self, body: &str) -> Self {
        let doc = plist_document(body);
        self.file(
            "Contents/Frameworks/Electron Framework.framework/Resources/Info.plist",
            doc.as_bytes(),
        )
    }

    pub fn archive(self) -> Self {
        self.file("Contents/Resources/app.asar", b"asar")
    }

    pub fn runtime_archive(self) -> Self {
        self.file("Contents/Resources/electron.asar", b"asar")
    }

    pub fn package_json(self, json: &str) -> Self {
        self.file("Contents/Resources/app/package.json", json.as_bytes())
    }

    pub fn executable(self, content: &[u8]) -> Self {
        let stem = self.stem();
        self.executable_named(&stem, content)
    }

    pub fn executable_named(self, name: &str, content: &[u8]) -> Self {
        let relative = format!("Contents/MacOS/{}", name);
        self.file(&relative, content)
    }
}

/// An install directory holding `<name>.exe` and `resources/`.
pub struct WindowsApp {
    dir: PathBuf,
    name: String,
}

impl WindowsApp {
    pub fn new(parent: &Path, name: &str) -> Self {
        let dir = parent.join(name);
        fs::create_dir_all(dir.join("resources")).unwrap();
        Self {
            dir,
            name: name.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exe_path(&self) -> PathBuf {
        self.dir.join(format!("{}.exe", self.name))
    }

    pub fn file(self, relative: &str, content: &[u8]) -> Self {
        write(&self.dir.join(relative), content);
        self
    }

    pub fn executable(self, content: &[u8]) -> Self {
        write(&self.exe_path(), content);
        self
    }

    pub fn archive(self) -> Self {
        self.file("resources/app.asar", b"asar")
    }

    pub fn runtime_archive(self) -> Self {
        self.file("resources/electron.asar", b"asar")
    }

    pub fn package_json(self, json: &str) -> Self {
        self.file("resources/app/package.json", json.as_bytes())
    }
}
