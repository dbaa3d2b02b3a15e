//! Foundations validation
//!
//! Checks that a project's foundation documents (PRD, vision, ICP, brand,
//! marketing) are present and that `handoff-manifest.json` is well-formed.

pub mod category;
pub mod discovery;
pub mod manifest;
pub mod report;

pub use category::{categorize_file, DocumentCategory, Requirement};
pub use discovery::{classify_documents, find_foundations_dir, list_markdown_files};
pub use manifest::{
    validate_manifest, validate_manifest_value, ManifestStatus, ManifestValidation, MANIFEST_FILE,
};
pub use report::{FoundationsReport, Readiness};

use std::path::Path;
use tracing::warn;

/// Discover, scan and validate the foundations directory above `start`.
pub fn validate_foundations(start: &Path) -> FoundationsReport {
    let Some(dir) = find_foundations_dir(start) else {
        return FoundationsReport::missing_directory();
    };

    let files = list_markdown_files(&dir).unwrap_or_else(|e| {
        warn!(dir = %dir.display(), error = %e, "Failed to list foundations directory");
        Vec::new()
    });
    let found = classify_documents(&files);
    let manifest = validate_manifest(&dir.join(MANIFEST_FILE));

    FoundationsReport::new(dir, files, found, manifest)
}
