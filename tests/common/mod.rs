//! Shared fixtures for the integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Copy the sample `data/` directory into a fresh temp dir
///
/// Returns the temp dir and the path of its `data/` copy.
pub fn sample_data() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let target = tmp.path().join("data");

    for entry in walkdir::WalkDir::new(&source) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(&source).unwrap();
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).unwrap();
        } else {
            fs::copy(entry.path(), &dest).unwrap();
        }
    }
    (tmp, target)
}
