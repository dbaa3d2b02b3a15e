//! Foundation document categories and filename classification.

use std::fmt;

/// Whether a category must be present for the project to be ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Advisable,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Requirement::Required => "REQUIRED",
            Requirement::Advisable => "ADVISABLE",
        })
    }
}

/// Foundation document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentCategory {
    Prd,
    Vision,
    Icp,
    Brand,
    Marketing,
}

impl DocumentCategory {
    /// All categories in table order.
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::Prd,
        DocumentCategory::Vision,
        DocumentCategory::Icp,
        DocumentCategory::Brand,
        DocumentCategory::Marketing,
    ];

    pub const REQUIRED: [DocumentCategory; 2] = [DocumentCategory::Prd, DocumentCategory::Vision];

    pub const ADVISABLE: [DocumentCategory; 3] = [
        DocumentCategory::Icp,
        DocumentCategory::Brand,
        DocumentCategory::Marketing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DocumentCategory::Prd => "prd",
            DocumentCategory::Vision => "vision",
            DocumentCategory::Icp => "icp",
            DocumentCategory::Brand => "brand",
            DocumentCategory::Marketing => "marketing",
        }
    }

    /// Lower-case filenames recognised for this category.
    pub fn filenames(&self) -> &'static [&'static str] {
        match self {
            DocumentCategory::Prd => &["prd.md", "requirements.md", "product-requirements.md"],
            DocumentCategory::Vision => &["vision-mission.md", "vision.md", "strategic-plan.md"],
            DocumentCategory::Icp => &["client-success-blueprint.md", "icp.md", "personas.md"],
            DocumentCategory::Brand => {
                &["brand-style-guidelines.md", "brand.md", "style-guide.md"]
            }
            DocumentCategory::Marketing => {
                &["marketing-bible.md", "marketing.md", "positioning.md"]
            }
        }
    }

    pub fn requirement(&self) -> Requirement {
        if Self::REQUIRED.contains(self) {
            Requirement::Required
        } else {
            Requirement::Advisable
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a document by exact (case-insensitive) filename.
pub fn categorize_file(filename: &str) -> Option<DocumentCategory> {
    let lower = filename.to_lowercase();
    DocumentCategory::ALL
        .into_iter()
        .find(|category| category.filenames().contains(&lower.as_str()))
}
