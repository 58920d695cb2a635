//! File-extension filter shared by discovery and staging

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Matches filenames by extension, case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ExtensionFilter {
    /// Lowercase extension without the leading dot
    extension: String,
}

impl ExtensionFilter {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim().trim_start_matches('.').to_lowercase(),
        }
    }

    pub fn pdf() -> Self {
        Self::new("pdf")
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether `filename` ends in `.<extension>`
    ///
    /// A bare `.pdf` matches too; staging gives it a stem.
    pub fn matches(&self, filename: &str) -> bool {
        if self.extension.is_empty() {
            return false;
        }
        let lower = filename.to_lowercase();
        lower
            .strip_suffix(&self.extension)
            .is_some_and(|rest| rest.ends_with('.'))
    }

    /// Whether a path's file name matches
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.matches(n))
    }
}

impl From<String> for ExtensionFilter {
    fn from(extension: String) -> Self {
        Self::new(&extension)
    }
}

impl From<ExtensionFilter> for String {
    fn from(filter: ExtensionFilter) -> Self {
        filter.extension
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::pdf()
    }
}
