//! Front-matter validation against the required/suggested key sets

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUIRED_KEYS: &[&str] = &["status", "type", "owner", "lastReviewed"];
pub const DEFAULT_SUGGESTED_KEYS: &[&str] =
    &["author", "date", "version", "tags", "related_documents"];

/// Key sets a document's front matter is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterSchema {
    pub required: Vec<String>,
    pub suggested: Vec<String>,
}

impl Default for FrontMatterSchema {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED_KEYS.iter().map(|k| k.to_string()).collect(),
            suggested: DEFAULT_SUGGESTED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Validation result for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatterReport {
    pub present: bool,
    /// Required keys not present, in schema order
    pub missing_required: Vec<String>,
    /// Suggested keys not present, in schema order
    pub missing_suggested: Vec<String>,
    pub completeness_pct: u8,
}

impl FrontMatterSchema {
    pub fn new(required: Vec<String>, suggested: Vec<String>) -> Self {
        Self { required, suggested }
    }

    /// Check `entries` against the schema.
    ///
    /// A key counts as present even when its value is empty. Completeness is
    /// the rounded share of required keys present, 0 when there is no front
    /// matter at all.
    pub fn validate(&self, entries: &IndexMap<String, String>, present: bool) -> FrontMatterReport {
        let missing = |keys: &[String]| -> Vec<String> {
            keys.iter()
                .filter(|k| !entries.contains_key(k.as_str()))
                .cloned()
                .collect()
        };
        let missing_required = missing(&self.required);
        let missing_suggested = missing(&self.suggested);

        let completeness_pct = if !present {
            0
        } else if self.required.is_empty() {
            100
        } else {
            let found = self.required.len() - missing_required.len();
            (found as f64 / self.required.len() as f64 * 100.0).round() as u8
        };

        FrontMatterReport {
            present,
            missing_required,
            missing_suggested,
            completeness_pct,
        }
    }
}
