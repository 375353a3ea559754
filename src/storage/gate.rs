//! Startup compatibility check
//!
//! The gate is the only way to obtain a [`Workspace`], so nothing can read
//! the catalog or the history ledger before the stored compatibility stamp
//! has been checked. On a mismatch the operator decides: reset (delete the
//! whole installation root and start over) or abort with nothing written.

use crate::config::paths::AppPaths;
use crate::config::Settings;
use crate::error::{RobotCopyError, RobotCopyResult};

use super::environment::{Environment, ENVIRONMENT_RECORD};
use super::records::{Namespace, RecordStore};
use super::Workspace;

/// Compatibility stamp of this build's record layout
pub const COMPATIBILITY_VERSION: u32 = 1;

/// How the gate resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// No environment record existed; a fresh one was written
    Created,
    /// The stored stamp matched
    Matched,
    /// The stamp differed and the operator agreed to delete everything
    Reset { stored: Option<u32> },
}

/// Asks the operator whether incompatible data may be deleted
pub trait ResetPrompt {
    /// `stored` is `None` when the stamp is missing or unreadable
    fn confirm_reset(&self, stored: Option<u32>, expected: u32) -> bool;
}

impl<F> ResetPrompt for F
where
    F: Fn(Option<u32>, u32) -> bool,
{
    fn confirm_reset(&self, stored: Option<u32>, expected: u32) -> bool {
        self(stored, expected)
    }
}

/// Compatibility gate over one installation root
pub struct CompatibilityGate {
    paths: AppPaths,
    version: u32,
}

impl CompatibilityGate {
    pub fn new(paths: AppPaths) -> Self {
        Self {
            paths,
            version: COMPATIBILITY_VERSION,
        }
    }

    /// Check against a different build stamp
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Run the check and hand out the workspace
    ///
    /// # Errors
    ///
    /// `IncompatibleData` when the operator declines the reset; the record
    /// store is left exactly as it was found. Storage errors otherwise.
    pub fn open(self, prompt: &dyn ResetPrompt) -> RobotCopyResult<Workspace> {
        let records = RecordStore::new(self.paths);
        let environment = Environment::new(&records);

        let outcome = if !records.exists(Namespace::Root, ENVIRONMENT_RECORD) {
            environment.initialize(self.version)?;
            GateOutcome::Created
        } else {
            // An unreadable record counts as an unknown stamp
            let stored = match environment.compatibility_version() {
                Ok(stored) => stored,
                Err(RobotCopyError::Json(_)) => None,
                Err(e) => return Err(e),
            };

            if stored == Some(self.version) {
                GateOutcome::Matched
            } else if prompt.confirm_reset(stored, self.version) {
                tracing::warn!(stored = ?stored, expected = self.version, "deleting incompatible data");
                records.destroy_all()?;
                environment.initialize(self.version)?;
                GateOutcome::Reset { stored }
            } else {
                tracing::warn!(
                    stored = ?stored,
                    expected = self.version,
                    "incompatible data kept, aborting"
                );
                return Err(RobotCopyError::IncompatibleData {
                    stored,
                    expected: self.version,
                });
            }
        };

        records.paths().ensure_directories()?;
        let settings = Settings::load_or_create(&records)?;
        Ok(Workspace::new(records, settings, outcome))
    }
}
