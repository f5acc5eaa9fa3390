//! Test helpers for preview CLI workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Registry entries used by tests that load a registry file.
pub(super) const HARBOUR_REGISTRY: &str = r#"[
    {"name": "Harbour", "latitude": 57.7050, "longitude": 11.9400},
    {"name": "Museum", "latitude": 57.7000, "longitude": 11.9900}
]"#;

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Split captured output into the GeoJSON document and the summary line.
pub(super) fn split_output(output: &str) -> (serde_json::Value, String) {
    let trimmed = output.trim_end();
    let (json, summary) = trimmed
        .rsplit_once('\n')
        .expect("output should hold GeoJSON followed by a summary");
    let collection = serde_json::from_str(json).expect("output should start with GeoJSON");
    (collection, summary.to_owned())
}
