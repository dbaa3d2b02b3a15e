//! Handoff manifest shape validation.

use serde_json::Value;
use std::path::Path;

/// Manifest file name inside the foundations directory.
pub const MANIFEST_FILE: &str = "handoff-manifest.json";

const REQUIRED_FIELDS: [&str; 2] = ["meta", "documents"];
const DOCUMENT_FIELDS: [&str; 4] = ["filename", "path", "category", "status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStatus {
    /// No manifest on disk; reported as skipped.
    NotFound,
    Valid,
    Invalid,
}

/// Outcome of validating the manifest. Never an error: problems are
/// reported through `status` and `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestValidation {
    pub status: ManifestStatus,
    pub message: String,
}

impl ManifestValidation {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: ManifestStatus::Invalid,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ManifestStatus::Valid
    }
}

/// Read and validate the manifest at `path`.
pub fn validate_manifest(path: &Path) -> ManifestValidation {
    if !path.exists() {
        return ManifestValidation {
            status: ManifestStatus::NotFound,
            message: format!("{} not found (run /foundations init)", MANIFEST_FILE),
        };
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => return ManifestValidation::invalid(format!("Failed to read manifest: {}", e)),
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(manifest) => validate_manifest_value(&manifest),
        Err(e) => ManifestValidation::invalid(format!("Invalid JSON: {}", e)),
    }
}

/// Validate an already-parsed manifest document.
pub fn validate_manifest_value(manifest: &Value) -> ManifestValidation {
    let Some(object) = manifest.as_object() else {
        return ManifestValidation::invalid("Manifest must be a JSON object");
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !object.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return ManifestValidation::invalid(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ));
    }

    let Some(documents) = object.get("documents").and_then(Value::as_array) else {
        return ManifestValidation::invalid("'documents' must be an array");
    };
    if documents.is_empty() {
        return ManifestValidation::invalid("No documents registered in manifest");
    }

    for (i, doc) in documents.iter().enumerate() {
        let Some(doc) = doc.as_object() else {
            return ManifestValidation::invalid(format!("Document at index {} must be an object", i));
        };
        let doc_missing: Vec<&str> = DOCUMENT_FIELDS
            .into_iter()
            .filter(|field| !doc.contains_key(*field))
            .collect();
        if !doc_missing.is_empty() {
            return ManifestValidation::invalid(format!(
                "Document at index {} missing fields: {}",
                i,
                doc_missing.join(", ")
            ));
        }
    }

    ManifestValidation {
        status: ManifestStatus::Valid,
        message: format!("Valid manifest with {} document(s)", documents.len()),
    }
}
