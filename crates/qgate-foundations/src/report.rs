//! Readiness verdict and console report.

use crate::category::{categorize_file, DocumentCategory};
use crate::manifest::{ManifestStatus, ManifestValidation};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Overall readiness of the foundations directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No foundations directory was found.
    MissingDirectory,
    /// At least one required category is absent.
    MissingRequired,
    /// All required categories present, some advisable ones missing.
    Ready { advisable_missing: usize },
    FullyReady,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. } | Readiness::FullyReady)
    }

    /// Process exit code: 0 when ready, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_ready() {
            0
        } else {
            1
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Readiness::MissingDirectory => "NOT READY (foundations directory missing)".to_string(),
            Readiness::MissingRequired => "NOT READY (missing required documents)".to_string(),
            Readiness::Ready { advisable_missing } => format!(
                "READY ({} advisable document(s) missing)",
                advisable_missing
            ),
            Readiness::FullyReady => "FULLY READY (all documents present)".to_string(),
        }
    }
}

/// Everything gathered about a foundations directory.
#[derive(Debug, Clone)]
pub struct FoundationsReport {
    pub foundations_dir: Option<PathBuf>,

    /// Markdown file names in the directory, sorted.
    pub files: Vec<String>,

    /// First matching file per category.
    pub found: BTreeMap<DocumentCategory, String>,

    /// `None` when no directory was found.
    pub manifest: Option<ManifestValidation>,
}

impl FoundationsReport {
    pub fn new(
        foundations_dir: PathBuf,
        files: Vec<String>,
        found: BTreeMap<DocumentCategory, String>,
        manifest: ManifestValidation,
    ) -> Self {
        Self {
            foundations_dir: Some(foundations_dir),
            files,
            found,
            manifest: Some(manifest),
        }
    }

    pub fn missing_directory() -> Self {
        Self {
            foundations_dir: None,
            files: Vec::new(),
            found: BTreeMap::new(),
            manifest: None,
        }
    }

    pub fn missing_advisable(&self) -> Vec<DocumentCategory> {
        DocumentCategory::ADVISABLE
            .into_iter()
            .filter(|c| !self.found.contains_key(c))
            .collect()
    }

    pub fn readiness(&self) -> Readiness {
        if self.foundations_dir.is_none() {
            return Readiness::MissingDirectory;
        }
        if DocumentCategory::REQUIRED
            .iter()
            .any(|c| !self.found.contains_key(c))
        {
            return Readiness::MissingRequired;
        }
        match self.missing_advisable().len() {
            0 => Readiness::FullyReady,
            advisable_missing => Readiness::Ready { advisable_missing },
        }
    }

    /// Render the console report.
    pub fn render(&self) -> String {
        let banner = "=".repeat(40);
        let mut lines = vec![
            String::new(),
            banner.clone(),
            "=== FOUNDATIONS VALIDATION REPORT ===".to_string(),
            banner,
            String::new(),
        ];

        let Some(dir) = &self.foundations_dir else {
            lines.push("Directory: documents/foundations/".to_string());
            lines.push("  Status: NOT FOUND".to_string());
            lines.push(String::new());
            lines.push("Run '/foundations init' to create the foundations directory.".to_string());
            lines.push(String::new());
            lines.push(format!("RESULT: {}", self.readiness().summary()));
            return lines.join("\n");
        };

        lines.push(format!("Directory: {}", dir.display()));
        lines.push("  Status: EXISTS".to_string());
        lines.push(String::new());

        lines.push("Documents Found:".to_string());
        if self.files.is_empty() {
            lines.push("  (no markdown files found)".to_string());
        }
        for file in &self.files {
            match categorize_file(file) {
                Some(category) => lines.push(format!(
                    "  - {} -> category: {} [{}]",
                    file,
                    category,
                    category.requirement()
                )),
                None => lines.push(format!("  - {} -> category: unknown", file)),
            }
        }
        lines.push(String::new());

        lines.push("Required Check:".to_string());
        self.push_category_lines(&mut lines, &DocumentCategory::REQUIRED);
        lines.push(String::new());

        lines.push("Advisable Check:".to_string());
        self.push_category_lines(&mut lines, &DocumentCategory::ADVISABLE);
        lines.push(String::new());

        lines.push("Manifest Validation:".to_string());
        if let Some(manifest) = &self.manifest {
            let tag = match manifest.status {
                ManifestStatus::NotFound => "[SKIP]",
                ManifestStatus::Valid => "[PASS]",
                ManifestStatus::Invalid => "[FAIL]",
            };
            lines.push(format!("  {} {}", tag, manifest.message));
        }
        lines.push(String::new());

        lines.push(format!("RESULT: {}", self.readiness().summary()));
        lines.join("\n")
    }

    fn push_category_lines(&self, lines: &mut Vec<String>, categories: &[DocumentCategory]) {
        for category in categories {
            match self.found.get(category) {
                Some(file) => lines.push(format!("  [PASS] {}: {}", category, file)),
                None => lines.push(format!("  [MISS] {}: not found", category)),
            }
        }
    }
}
