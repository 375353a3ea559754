//! Backup definition catalog
//!
//! One record per definition in the Backups namespace, named `Backup<id>`
//! with the backup-entry extension. Identifiers come from the `TotalBackups`
//! environment counter and are never reused while their record exists.
//!
//! The catalog trusts its input: validation happens in
//! `services::setup` before anything reaches `create` or `edit`.

use crate::error::{RobotCopyError, RobotCopyResult};
use crate::models::{BackupDefinition, BackupId, BackupPlan};

use super::environment::{Environment, TOTAL_BACKUPS_KEY};
use super::records::{FileType, Namespace, RecordStore};

/// Repository for backup definitions
pub struct BackupCatalog<'a> {
    records: &'a RecordStore,
}

impl<'a> BackupCatalog<'a> {
    pub(crate) fn new(records: &'a RecordStore) -> Self {
        Self { records }
    }

    /// Persist `plan` under a freshly allocated identifier
    ///
    /// The counter is written after the definition, so a failed save
    /// allocates nothing.
    pub fn create(&self, plan: BackupPlan) -> RobotCopyResult<BackupDefinition> {
        let environment = Environment::new(self.records);

        let mut next = environment.get(TOTAL_BACKUPS_KEY, 0)? + 1;
        while self
            .records
            .exists(Namespace::Backups, &BackupId::new(next).record_name())
        {
            tracing::warn!(id = next, "identifier already taken, skipping");
            next += 1;
        }

        let definition = BackupDefinition::new(BackupId::new(next), plan);
        self.write(&definition)?;
        environment.set(TOTAL_BACKUPS_KEY, next)?;

        tracing::debug!(id = next, name = %definition.plan.name, "created backup definition");
        Ok(definition)
    }

    /// Replace every field of an existing definition
    pub fn edit(&self, id: BackupId, plan: BackupPlan) -> RobotCopyResult<BackupDefinition> {
        if !self.records.exists(Namespace::Backups, &id.record_name()) {
            return Err(RobotCopyError::backup_not_found(id.to_string()));
        }

        let definition = BackupDefinition::new(id, plan);
        self.write(&definition)?;
        Ok(definition)
    }

    /// All readable definitions, ordered by identifier
    ///
    /// Records that fail to load are logged and left out.
    pub fn list(&self) -> RobotCopyResult<Vec<BackupDefinition>> {
        let mut definitions = Vec::new();

        for name in self.records.list_names(Namespace::Backups)? {
            let Some(id) = BackupId::from_record_name(&name) else {
                tracing::warn!(record = %name, "ignoring unexpected record in backups");
                continue;
            };

            match self.records.load::<BackupDefinition>(Namespace::Backups, &name) {
                Ok(Some(definition)) if definition.id == id => definitions.push(definition),
                Ok(Some(definition)) => {
                    tracing::warn!(
                        record = %name,
                        stored_id = %definition.id,
                        "skipping definition stored under another identifier"
                    );
                }
                // Removed between listing and loading
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(record = %name, error = %e, "skipping unreadable definition");
                }
            }
        }

        definitions.sort_by_key(|d| d.id);
        Ok(definitions)
    }

    /// Find a definition by identifier
    pub fn find(&self, id: BackupId) -> RobotCopyResult<Option<BackupDefinition>> {
        self.records.load(Namespace::Backups, &id.record_name())
    }

    /// Find a definition that must exist
    pub fn get(&self, id: BackupId) -> RobotCopyResult<BackupDefinition> {
        self.find(id)?
            .ok_or_else(|| RobotCopyError::backup_not_found(id.to_string()))
    }

    /// Delete a definition; `Ok(false)` when it did not exist
    pub fn remove(&self, id: BackupId) -> RobotCopyResult<bool> {
        self.records.remove(Namespace::Backups, &id.record_name())
    }

    fn write(&self, definition: &BackupDefinition) -> RobotCopyResult<()> {
        self.records.save(
            Namespace::Backups,
            &definition.id.record_name(),
            definition,
            Some(FileType::BackupEntry),
        )
    }
}
