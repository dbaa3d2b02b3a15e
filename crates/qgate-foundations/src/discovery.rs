//! Locating the foundations directory and scanning its documents.

use crate::category::{categorize_file, DocumentCategory};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory names searched, in priority order, at each level.
pub const SEARCH_DIRS: [&str; 3] = ["documents/foundations", "docs/foundations", "foundations"];

/// Find the foundations directory at `start` or the nearest ancestor.
pub fn find_foundations_dir(start: &Path) -> Option<PathBuf> {
    let start = absolute(start);

    for dir in start.ancestors() {
        for sub in SEARCH_DIRS {
            let candidate = dir.join(sub);
            if candidate.is_dir() {
                debug!(path = %candidate.display(), "Found foundations directory");
                return Some(candidate);
            }
        }
    }
    None
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

/// Names of `*.md` files directly inside `dir`, sorted.
pub fn list_markdown_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Map each category to the first matching filename.
pub fn classify_documents(files: &[String]) -> BTreeMap<DocumentCategory, String> {
    let mut found = BTreeMap::new();
    for file in files {
        if let Some(category) = categorize_file(file) {
            found.entry(category).or_insert_with(|| file.clone());
        }
    }
    found
}
