//! Backup setup service
//!
//! The validation and defaulting pass every definition goes through before
//! the catalog sees it. Checks run cheapest first and stop at the first
//! failure; nothing is written unless all of them pass.

use std::path::{Path, PathBuf};

use crate::error::{RobotCopyError, RobotCopyResult};
use crate::fs::access::{check_access, AccessType};
use crate::fs::relation::{relate, Relation};
use crate::models::{BackupDefinition, BackupDraft, BackupId, BackupPlan};
use crate::storage::Workspace;

/// Service for creating and editing backup definitions
pub struct SetupService<'a> {
    workspace: &'a Workspace,
    probe_access: bool,
}

impl<'a> SetupService<'a> {
    /// Create a new setup service; folder access is probed by default
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            probe_access: true,
        }
    }

    /// Skip the read/write probes on origin and destination
    pub fn without_access_probes(mut self) -> Self {
        self.probe_access = false;
        self
    }

    /// Validate a draft and fill in its defaults
    ///
    /// Origin and destination in the returned plan are resolved absolute
    /// paths.
    pub fn prepare(&self, draft: BackupDraft) -> RobotCopyResult<BackupPlan> {
        let origin_text = draft.origin.trim();
        let destination_text = draft.destination.trim();
        if origin_text.is_empty() {
            return Err(RobotCopyError::Validation(
                "Origin folder cannot be empty".into(),
            ));
        }
        if destination_text.is_empty() {
            return Err(RobotCopyError::Validation(
                "Destination folder cannot be empty".into(),
            ));
        }

        let max = self.workspace.settings().name_max_chars;
        if let Some(name) = &draft.name {
            let length = name.trim().chars().count();
            if length > max {
                return Err(RobotCopyError::NameTooLong { length, max });
            }
        }

        let origin = Path::new(origin_text);
        let destination = Path::new(destination_text);
        let (origin, destination) = resolve_pair(origin, destination)?;

        match relate(&origin, &destination) {
            Some(Relation::Disjoint) => {}
            Some(Relation::Identical) => return Err(RobotCopyError::IdenticalTargets(origin)),
            Some(Relation::Nested) => {
                return Err(RobotCopyError::NestedTargets {
                    origin,
                    destination,
                })
            }
            None => return Err(RobotCopyError::UndeterminedRelation(origin, destination)),
        }

        if self.probe_access {
            check_access(&origin, AccessType::Read)?;
            check_access(&destination, AccessType::Write)?;
        }

        let default_name = &self.workspace.settings().default_backup_name;
        Ok(draft.resolve(default_name, origin, destination))
    }

    /// Validate a draft and store it under a new identifier
    pub fn create(&self, draft: BackupDraft) -> RobotCopyResult<BackupDefinition> {
        let plan = self.prepare(draft)?;
        self.workspace.catalog().create(plan)
    }

    /// Validate a draft and replace an existing definition with it
    pub fn edit(&self, id: BackupId, draft: BackupDraft) -> RobotCopyResult<BackupDefinition> {
        let catalog = self.workspace.catalog();
        // Unknown ids fail before any validation work
        catalog.get(id)?;

        let plan = self.prepare(draft)?;
        catalog.edit(id, plan)
    }
}

fn resolve_pair(origin: &Path, destination: &Path) -> RobotCopyResult<(PathBuf, PathBuf)> {
    let undetermined =
        || RobotCopyError::UndeterminedRelation(origin.to_path_buf(), destination.to_path_buf());
    let origin = crate::fs::relation::resolve(origin).ok_or_else(undetermined)?;
    let destination = crate::fs::relation::resolve(destination).ok_or_else(undetermined)?;
    Ok((origin, destination))
}
