//! Storage layer for RobotCopy
//!
//! Provides a keyed JSON record store with atomic writes, and the catalog,
//! history ledger and environment counters built on top of it. All of them
//! are reached through a [`Workspace`], which only the compatibility gate
//! hands out.

pub mod catalog;
pub mod environment;
pub mod file_io;
pub mod gate;
pub mod history;
pub mod records;

pub use catalog::BackupCatalog;
pub use environment::{Environment, EnvironmentCounters, ENVIRONMENT_RECORD};
pub use file_io::{read_json, write_json_atomic};
pub use gate::{CompatibilityGate, GateOutcome, ResetPrompt, COMPATIBILITY_VERSION};
pub use history::HistoryLedger;
pub use records::{FileType, Namespace, Record, RecordStore, BACKUP_ENTRY_EXTENSION};

use crate::config::paths::AppPaths;
use crate::config::Settings;
use crate::error::RobotCopyResult;

/// An installation root that has passed the compatibility gate
pub struct Workspace {
    records: RecordStore,
    settings: Settings,
    outcome: GateOutcome,
}

impl Workspace {
    pub(crate) fn new(records: RecordStore, settings: Settings, outcome: GateOutcome) -> Self {
        Self {
            records,
            settings,
            outcome,
        }
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &AppPaths {
        self.records.paths()
    }

    /// Raw record access
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persist new settings and use them from now on
    pub fn update_settings(&mut self, settings: Settings) -> RobotCopyResult<()> {
        settings.save(&self.records)?;
        self.settings = settings;
        Ok(())
    }

    /// How the gate resolved when this workspace was opened
    pub fn outcome(&self) -> GateOutcome {
        self.outcome
    }

    pub fn environment(&self) -> Environment<'_> {
        Environment::new(&self.records)
    }

    pub fn catalog(&self) -> BackupCatalog<'_> {
        BackupCatalog::new(&self.records)
    }

    pub fn history(&self) -> HistoryLedger<'_> {
        HistoryLedger::new(&self.records)
    }
}
