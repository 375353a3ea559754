//! User settings for RobotCopy
//!
//! Tunables that used to live in process-wide feature flags. A `Settings`
//! value is handed to whatever needs it; nothing reads it from global state.

use serde::{Deserialize, Serialize};

use crate::error::{RobotCopyError, RobotCopyResult};
use crate::fs::analyzer::DEFAULT_MAX_DEPTH;
use crate::storage::records::{Namespace, RecordStore};

/// Record name of the settings file in the General namespace
pub const SETTINGS_RECORD: &str = "settings";

/// User settings for RobotCopy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Longest accepted backup display name, in characters
    #[serde(default = "default_name_max_chars")]
    pub name_max_chars: usize,

    /// Name given to a definition saved without one
    #[serde(default = "default_backup_name")]
    pub default_backup_name: String,

    /// Depth budget for folder analysis
    #[serde(default = "default_analyzer_max_depth")]
    pub analyzer_max_depth: u32,

    /// Worker count for folder analysis (None = available parallelism)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer_workers: Option<usize>,
}

fn default_name_max_chars() -> usize {
    80
}

fn default_backup_name() -> String {
    "Backup".to_string()
}

fn default_analyzer_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name_max_chars: default_name_max_chars(),
            default_backup_name: default_backup_name(),
            analyzer_max_depth: default_analyzer_max_depth(),
            analyzer_workers: None,
        }
    }
}

impl Settings {
    /// Load settings from the store, persisting the defaults on first run
    ///
    /// A settings record that cannot be parsed is left on disk and the
    /// defaults are used until settings are saved again.
    pub fn load_or_create(records: &RecordStore) -> RobotCopyResult<Self> {
        match records.load_or_create(Namespace::General, SETTINGS_RECORD, Settings::default(), None)
        {
            Err(RobotCopyError::Json(reason)) => {
                tracing::warn!(error = %reason, "unreadable settings, using defaults");
                Ok(Settings::default())
            }
            other => other,
        }
    }

    /// Save settings to the store
    pub fn save(&self, records: &RecordStore) -> RobotCopyResult<()> {
        records.save(Namespace::General, SETTINGS_RECORD, self, None)
    }
}
