//! Markdown content discovery.
//!
//! Walks the content root and collects every `.md` file that is not on the
//! exclusion list (section index and not-found pages by default).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Errors that abort the whole run before any file is processed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("content directory not found: {}", .0.display())]
    MissingRoot(PathBuf),
}

/// Recursively collect markdown files under `root`, skipping any file whose
/// name is in `excluded`. The result is sorted so every run processes files
/// in the same order.
pub fn scan_content(root: &Path, excluded: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if excluded.iter().any(|excluded| excluded.as_str() == name) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}
