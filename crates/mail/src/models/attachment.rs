//! Attachment descriptors and run results

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ContentRef, MessageId};

/// A discovered attachment, ready to be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub message_id: MessageId,
    pub content: ContentRef,
    /// Filename as given by the message metadata
    pub filename: String,
}

/// Statistics from a pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Number of result pages fetched
    pub pages_fetched: usize,
    /// Number of messages scanned for attachments
    pub messages_scanned: usize,
    /// Stale files that could not be removed before the run
    pub stale_files_skipped: usize,
    /// Duration of the run
    pub duration_ms: u64,
}

/// Outcome of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Attachments fetched and written during the run
    pub files_downloaded: usize,
    /// Archive written, or `None` when nothing was downloaded
    pub archive_path: Option<PathBuf>,
    pub stats: RunStats,
}

impl RunResult {
    /// Result for a run that found nothing
    pub fn empty(stats: RunStats) -> Self {
        Self {
            files_downloaded: 0,
            archive_path: None,
            stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files_downloaded == 0
    }

    /// Archive path as a string; empty when no archive was created
    pub fn archive_path_str(&self) -> String {
        self.archive_path
            .as_deref()
            .map(Path::to_string_lossy)
            .map(|s| s.into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_has_blank_path() {
        let result = RunResult::empty(RunStats::default());
        assert!(result.is_empty());
        assert_eq!(result.archive_path_str(), "");
    }

    #[test]
    fn test_archive_path_str() {
        let result = RunResult {
            files_downloaded: 2,
            archive_path: Some(PathBuf::from("out/ICEGATE_2024-01-01_to_2024-01-31.zip")),
            stats: RunStats::default(),
        };
        assert_eq!(
            result.archive_path_str(),
            "out/ICEGATE_2024-01-01_to_2024-01-31.zip"
        );
    }
}
