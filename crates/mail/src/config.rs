//! Harvest settings
//!
//! Supports loading settings from (in order of priority):
//! 1. An explicit JSON file
//! 2. `settings.json` in the config directory
//! 3. Built-in defaults
//!
//! Every field is optional in the file; missing fields take their defaults.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::attachments::ExtensionFilter;
use crate::gmail::RetryPolicy;
use crate::staging::StaleFilePolicy;

/// Settings filename in the config directory
const SETTINGS_FILE: &str = "settings.json";

/// Retry settings for Gmail requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.initial_delay_ms))
    }
}

/// What to harvest and where to put it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// Only messages from this address are searched
    pub sender: String,
    /// Subject terms, any of which may match
    pub subject_terms: Vec<String>,
    /// Archive name prefix
    pub archive_prefix: String,
    /// Directory attachments are downloaded into
    pub staging_dir: PathBuf,
    /// Directory the archive is written to
    pub output_dir: PathBuf,
    /// Attachment extension to collect
    pub extension: ExtensionFilter,
    pub stale_file_policy: StaleFilePolicy,
    pub retry: RetrySettings,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            sender: "noreply@icegate.gov.in".to_string(),
            subject_terms: ["Final", "Final Copy", "LEO", "FINAL"]
                .into_iter()
                .map(String::from)
                .collect(),
            archive_prefix: "ICEGATE".to_string(),
            staging_dir: PathBuf::from("downloads"),
            output_dir: PathBuf::from("."),
            extension: ExtensionFilter::pdf(),
            stale_file_policy: StaleFilePolicy::Skip,
            retry: RetrySettings::default(),
        }
    }
}

impl HarvestSettings {
    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        let settings = if config::config_exists(SETTINGS_FILE) {
            config::load_json(SETTINGS_FILE)?
        } else {
            Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: Self = config::load_json_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get the default settings file path (~/.config/pdfharvest/settings.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() {
            bail!("sender must not be empty");
        }
        if self.extension.extension().is_empty() {
            bail!("extension must not be empty");
        }
        if self.archive_prefix.trim().is_empty() {
            bail!("archive_prefix must not be empty");
        }
        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        Ok(())
    }
}
