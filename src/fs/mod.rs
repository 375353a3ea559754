//! Filesystem inspection: path relations, access probes and folder statistics
//!
//! Nothing here touches the record store.

pub mod access;
pub mod analyzer;
pub mod relation;

pub use access::{can_access, check_access, validate_folder, AccessType};
pub use analyzer::{
    inspect, AnalysisIssue, AnalysisReport, CancellationToken, FolderAnalyzer, FolderStatistics,
    FolderSummary, IssueKind,
};
pub use relation::{nested, relate, resolve, same_target, Relation};
