//! Core data models for RobotCopy
//!
//! Backup definitions (what to copy, when) and the history entries written
//! after each run.

pub mod definition;
pub mod history;
pub mod ids;

pub use definition::{
    BackupDefinition, BackupDraft, BackupPlan, RecurrenceKind, StepUnit, TriggerKind, Weekday,
};
pub use history::{BackupHistoryEntry, OperationGroup, OperationResult};
pub use ids::BackupId;
