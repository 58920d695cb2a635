//! Flat staging directory for downloaded attachments
//!
//! Directory structure:
//! ```text
//! downloads/
//!   BE_2401001.pdf
//!   BE_2401002.pdf
//! ```
//!
//! One file per attachment name; a later attachment with the same name
//! overwrites the earlier one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::sanitize_filename;
use crate::attachments::ExtensionFilter;
use crate::error::RetrievalError;

/// What to do when a stale file cannot be deleted during [`StagingStore::reset`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleFilePolicy {
    /// Log a warning and leave the file; it will end up in the next archive
    #[default]
    Skip,
    /// Fail the run
    Abort,
}

/// Files handled by a reset
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResetReport {
    pub removed: usize,
    /// Files that could not be deleted and are still staged
    pub skipped: Vec<PathBuf>,
}

/// A staged file and the name it gets inside the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub arcname: String,
}

/// Deletes one stale file during [`StagingStore::reset`]
pub type RemoveFile = fn(&Path) -> io::Result<()>;

fn remove_staged_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Staging directory owned by one pipeline run at a time
pub struct StagingStore {
    root: PathBuf,
    filter: ExtensionFilter,
    policy: StaleFilePolicy,
    remove: RemoveFile,
}

impl StagingStore {
    /// Open the staging directory, creating it if needed
    pub fn new(
        root: impl AsRef<Path>,
        filter: ExtensionFilter,
        policy: StaleFilePolicy,
    ) -> Result<Self, RetrievalError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| RetrievalError::Staging {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            filter,
            policy,
            remove: remove_staged_file,
        })
    }

    /// Replace how stale files are deleted (e.g. to simulate a locked file)
    pub fn with_remover(mut self, remove: RemoveFile) -> Self {
        self.remove = remove;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete matching regular files left over from a previous run
    ///
    /// Directories and other non-file entries are left alone.
    pub fn reset(&self) -> Result<ResetReport, RetrievalError> {
        let mut report = ResetReport::default();

        for path in self.matching_files()? {
            match (self.remove)(&path) {
                Ok(()) => report.removed += 1,
                Err(source) => match self.policy {
                    StaleFilePolicy::Skip => {
                        log::warn!("File in use, skipped: {} ({})", path.display(), source);
                        report.skipped.push(path);
                    }
                    StaleFilePolicy::Abort => {
                        return Err(RetrievalError::Staging { path, source });
                    }
                },
            }
        }

        log::debug!(
            "Staging reset: {} removed, {} skipped",
            report.removed,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Write an attachment, overwriting any file of the same name
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, RetrievalError> {
        let path = self.root.join(sanitize_filename(filename));
        fs::write(&path, content).map_err(|source| RetrievalError::Staging {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Matching regular files, sorted by name
    pub fn list_staged_files(&self) -> Result<Vec<StagedFile>, RetrievalError> {
        let mut files: Vec<StagedFile> = self
            .matching_files()?
            .into_iter()
            .filter_map(|path| {
                let arcname = path.file_name()?.to_str()?.to_string();
                Some(StagedFile { path, arcname })
            })
            .collect();

        files.sort_by(|a, b| a.arcname.cmp(&b.arcname));
        Ok(files)
    }

    /// Regular files whose name passes the filter
    fn matching_files(&self) -> Result<Vec<PathBuf>, RetrievalError> {
        let staging_err = |source| RetrievalError::Staging {
            path: self.root.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(staging_err)? {
            let entry = entry.map_err(staging_err)?;
            let is_file = entry.file_type().map_err(staging_err)?.is_file();
            let path = entry.path();
            if is_file && self.filter.matches_path(&path) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
