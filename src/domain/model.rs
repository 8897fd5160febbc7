use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Role a unit plays in the merge: the entry translation unit, an included
/// header, or the companion source paired with a header by stem name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRole {
    Entry,
    Header,
    Source,
}

impl UnitRole {
    pub fn label(&self) -> &'static str {
        match self {
            UnitRole::Entry => "Entry",
            UnitRole::Header => "Header",
            UnitRole::Source => "Source",
        }
    }
}

/// One physical file, read once, identified by its canonical path.
/// `relative_path` is the root-relative form used in all reporting.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub relative_path: String,
    pub content: String,
    pub role: UnitRole,
}

/// Output of the expansion stage: the assembled document plus the summary
/// data the engine reports (both listings are sorted).
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub document: String,
    pub processed_files: Vec<String>,
    pub external_includes: Vec<String>,
}

/// Serializable run summary, written next to the output when requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub unit_count: usize,
    pub processed_files: Vec<String>,
    pub external_includes: Vec<String>,
}

impl MergeReport {
    pub fn from_result(result: &MergeResult) -> Self {
        Self {
            unit_count: result.processed_files.len(),
            processed_files: result.processed_files.clone(),
            external_includes: result.external_includes.clone(),
        }
    }
}
