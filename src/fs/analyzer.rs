//! Concurrent folder statistics
//!
//! The root folder is listed on the calling thread. Every immediate
//! subdirectory becomes one unit of work on a rayon pool built for this call
//! alone; a unit walks its subtree synchronously on the worker that picked it
//! up. The pool is dropped, and its threads joined, before `analyze` returns.
//!
//! Nothing in here fails as a whole. An unreadable or vanished entry
//! contributes zero and is recorded as an [`AnalysisIssue`]; a subtree past
//! the depth budget contributes zero and is recorded in
//! [`AnalysisReport::skipped_by_depth`].

use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::Settings;

use super::access::{can_access, AccessType};

/// Default depth budget below the analyzed root
pub const DEFAULT_MAX_DEPTH: u32 = 15;

/// Aggregate size and counts for a directory subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderStatistics {
    /// Sum of file sizes in bytes
    pub total_size: u64,
    pub file_count: u64,
    /// Subfolders that were successfully listed (the root is not counted)
    pub folder_count: u64,
}

impl FolderStatistics {
    pub fn is_empty(&self) -> bool {
        self.total_size == 0 && self.file_count == 0 && self.folder_count == 0
    }
}

impl AddAssign for FolderStatistics {
    fn add_assign(&mut self, other: Self) {
        self.total_size += other.total_size;
        self.file_count += other.file_count;
        self.folder_count += other.folder_count;
    }
}

/// Shared flag telling running analyses to stop picking up new subtrees
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why an entry contributed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    PermissionDenied,
    /// Removed between listing and inspection
    Vanished,
    Other,
}

impl From<io::ErrorKind> for IssueKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::Vanished,
            _ => Self::Other,
        }
    }
}

/// A contained failure at one node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisIssue {
    pub path: PathBuf,
    pub kind: IssueKind,
    pub message: String,
}

/// Statistics plus everything that was left out of them
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub stats: FolderStatistics,
    pub issues: Vec<AnalysisIssue>,
    /// Directories not listed because the depth budget ran out
    pub skipped_by_depth: Vec<PathBuf>,
    /// Set when at least one subtree was dropped after cancellation
    pub cancelled: bool,
}

impl AnalysisReport {
    /// True when nothing was skipped for any reason
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty() && self.skipped_by_depth.is_empty() && !self.cancelled
    }

    fn merge(&mut self, other: AnalysisReport) {
        self.stats += other.stats;
        self.issues.extend(other.issues);
        self.skipped_by_depth.extend(other.skipped_by_depth);
        self.cancelled |= other.cancelled;
    }

    fn issue(&mut self, path: &Path, err: &io::Error) {
        tracing::warn!(path = %path.display(), error = %err, "skipping inaccessible entry");
        self.issues.push(AnalysisIssue {
            path: path.to_path_buf(),
            kind: err.kind().into(),
            message: err.to_string(),
        });
    }
}

/// Folder analyzer with a depth budget and an optional worker cap
#[derive(Debug, Clone)]
pub struct FolderAnalyzer {
    max_depth: u32,
    workers: Option<usize>,
    cancellation: Option<CancellationToken>,
}

impl Default for FolderAnalyzer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            workers: None,
            cancellation: None,
        }
    }
}

impl FolderAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer configured from user settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_depth: settings.analyzer_max_depth,
            workers: settings.analyzer_workers,
            cancellation: None,
        }
    }

    /// Directories more than `max_depth` levels below the root are skipped
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Cap the worker pool (0 or unset = available parallelism)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Aggregate statistics for `root`
    pub fn analyze(&self, root: &Path) -> FolderStatistics {
        self.analyze_report(root).stats
    }

    /// Aggregate statistics for `root` along with the skipped entries
    pub fn analyze_report(&self, root: &Path) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        let mut subdirs = Vec::new();

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                report.issue(root, &e);
                return report;
            }
        };
        for entry in entries {
            match entry {
                Ok(entry) => {
                    if let Some(dir) = tally_entry(&entry, &mut report) {
                        subdirs.push(dir);
                    }
                }
                Err(e) => report.issue(root, &e),
            }
        }

        for unit in self.run_units(&subdirs) {
            report.merge(unit);
        }
        report
    }

    fn run_units(&self, subdirs: &[PathBuf]) -> Vec<AnalysisReport> {
        if subdirs.is_empty() {
            return Vec::new();
        }
        let unit = |dir: &PathBuf| {
            let mut report = AnalysisReport::default();
            self.walk(dir, self.max_depth, &mut report);
            report
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.unwrap_or(0))
            .thread_name(|i| format!("folder-analyzer-{}", i))
            .build();
        match pool {
            Ok(pool) => pool.install(|| subdirs.par_iter().map(unit).collect::<Vec<_>>()),
            Err(e) => {
                tracing::warn!(error = %e, "worker pool unavailable, analyzing sequentially");
                subdirs.iter().map(unit).collect()
            }
        }
    }

    fn walk(&self, dir: &Path, remaining: u32, report: &mut AnalysisReport) {
        if self.is_cancelled() {
            report.cancelled = true;
            return;
        }
        if remaining == 0 {
            tracing::debug!(path = %dir.display(), "depth budget exhausted, skipping subtree");
            report.skipped_by_depth.push(dir.to_path_buf());
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.issue(dir, &e);
                return;
            }
        };
        report.stats.folder_count += 1;

        for entry in entries {
            match entry {
                Ok(entry) => {
                    if let Some(child) = tally_entry(&entry, report) {
                        self.walk(&child, remaining - 1, report);
                    }
                }
                Err(e) => report.issue(dir, &e),
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }
}

/// Count a file entry into `report`; return the path if it is a directory
///
/// Symlinks are neither followed nor counted.
fn tally_entry(entry: &fs::DirEntry, report: &mut AnalysisReport) -> Option<PathBuf> {
    let path = entry.path();
    let file_type = match entry.file_type() {
        Ok(file_type) => file_type,
        Err(e) => {
            report.issue(&path, &e);
            return None;
        }
    };

    if file_type.is_dir() {
        return Some(path);
    }
    if file_type.is_file() {
        match entry.metadata() {
            Ok(metadata) => {
                report.stats.file_count += 1;
                report.stats.total_size += metadata.len();
            }
            Err(e) => report.issue(&path, &e),
        }
    }
    None
}

/// Presentation data for one folder
///
/// `None` fields are unknown: the path was empty or inaccessible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub path: Option<PathBuf>,
    pub name: Option<String>,
    /// Drive prefix or filesystem root the folder lives on
    pub drive: Option<String>,
    pub stats: Option<FolderStatistics>,
    /// Entries that could not be counted
    pub issue_count: usize,
}

impl FolderSummary {
    /// Summary with every field unknown
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.path.is_none()
    }

    /// Summary of a finished analysis of `path`
    pub fn from_report(path: &Path, report: &AnalysisReport) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            drive: drive_of(path),
            stats: Some(report.stats),
            issue_count: report.issues.len(),
        }
    }
}

/// Probe `path` for `access` and analyze it, or return the placeholder
pub fn inspect(path: &Path, access: AccessType, analyzer: &FolderAnalyzer) -> FolderSummary {
    if path.as_os_str().is_empty() || !can_access(path, access) {
        return FolderSummary::placeholder();
    }

    FolderSummary::from_report(path, &analyzer.analyze_report(path))
}

fn drive_of(path: &Path) -> Option<String> {
    match path.components().next()? {
        Component::Prefix(prefix) => Some(prefix.as_os_str().to_string_lossy().into_owned()),
        Component::RootDir => Some(std::path::MAIN_SEPARATOR.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(path: &Path, size: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![b'x'; size]).unwrap();
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let report = FolderAnalyzer::new().analyze_report(temp_dir.path());
        assert_eq!(report.stats, FolderStatistics::default());
        assert!(report.stats.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn test_counts_files_and_folders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("a.txt"), 10);
        write_file(&root.join("sub1").join("b.txt"), 20);
        write_file(&root.join("sub1").join("deep").join("c.txt"), 5);
        fs::create_dir(root.join("sub2")).unwrap();

        let stats = FolderAnalyzer::new().analyze(root);
        assert_eq!(
            stats,
            FolderStatistics {
                total_size: 35,
                file_count: 3,
                folder_count: 3,
            }
        );
    }

    #[test]
    fn test_single_worker_matches() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..6 {
            write_file(&root.join(format!("d{}", i)).join("f.bin"), 100);
        }

        let parallel = FolderAnalyzer::new().analyze(root);
        let single = FolderAnalyzer::new().with_workers(1).analyze(root);
        assert_eq!(parallel, single);
        assert_eq!(single.file_count, 6);
        assert_eq!(single.total_size, 600);
        assert_eq!(single.folder_count, 6);
    }

    #[test]
    fn test_depth_limit_excludes_deep_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let d1 = root.join("d1");
        let d2 = d1.join("d2");
        let d3 = d2.join("d3");
        write_file(&d1.join("one.txt"), 1);
        write_file(&d2.join("two.txt"), 2);
        write_file(&d3.join("three.txt"), 4);
        write_file(&d3.join("d4").join("four.txt"), 8);

        let report = FolderAnalyzer::new().with_max_depth(2).analyze_report(root);
        assert_eq!(report.stats.total_size, 3);
        assert_eq!(report.stats.file_count, 2);
        assert_eq!(report.stats.folder_count, 2);
        assert_eq!(report.skipped_by_depth, vec![d3]);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_zero_depth_counts_root_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("top.txt"), 7);
        write_file(&root.join("sub").join("inner.txt"), 9);

        let stats = FolderAnalyzer::new().with_max_depth(0).analyze(root);
        assert_eq!(stats.total_size, 7);
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.folder_count, 0);
    }

    #[test]
    fn test_missing_root_reports_issue() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let report = FolderAnalyzer::new().analyze_report(&missing);
        assert!(report.stats.is_empty());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::Vanished);
    }

    #[test]
    fn test_cancelled_before_start() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("top.txt"), 3);
        write_file(&root.join("sub").join("inner.txt"), 9);

        let token = CancellationToken::new();
        token.cancel();
        let report = FolderAnalyzer::new()
            .with_cancellation(token)
            .analyze_report(root);

        assert!(report.cancelled);
        assert_eq!(report.stats.file_count, 1);
        assert_eq!(report.stats.total_size, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_contained() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("ok1").join("a.txt"), 10);
        write_file(&root.join("ok2").join("b.txt"), 20);
        let locked = root.join("locked");
        write_file(&locked.join("secret.txt"), 1000);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the folder
        if fs::read_dir(&locked).is_ok() {
            eprintln!("running with elevated privileges, permission check skipped");
        } else {
            let report = FolderAnalyzer::new().analyze_report(root);
            assert_eq!(report.stats.total_size, 30);
            assert_eq!(report.stats.file_count, 2);
            assert_eq!(report.stats.folder_count, 2);
            assert_eq!(report.issues.len(), 1);
            assert_eq!(report.issues[0].path, locked);
            assert_eq!(report.issues[0].kind, IssueKind::PermissionDenied);
        }

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_vanished_subdirectory_is_contained() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("ok1").join("a.txt"), 10);
        write_file(&root.join("ok2").join("b.txt"), 20);
        // Listed by the parent, removed before its unit ran
        let gone = root.join("gone");

        let analyzer = FolderAnalyzer::new().with_workers(2);
        let mut report = AnalysisReport::default();
        for unit in analyzer.run_units(&[root.join("ok1"), gone.clone(), root.join("ok2")]) {
            report.merge(unit);
        }

        assert_eq!(report.stats.total_size, 30);
        assert_eq!(report.stats.file_count, 2);
        assert_eq!(report.stats.folder_count, 2);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, gone);
        assert_eq!(report.issues[0].kind, IssueKind::Vanished);
        assert!(!report.cancelled);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        write_file(&root.join("real.txt"), 5);
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("alias.txt")).unwrap();

        let stats = FolderAnalyzer::new().analyze(&root);
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.total_size, 5);
        assert_eq!(stats.folder_count, 0);
    }

    #[test]
    fn test_inspect() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("Documents");
        write_file(&folder.join("letter.txt"), 12);

        let summary = inspect(&folder, AccessType::Read, &FolderAnalyzer::new());
        assert!(!summary.is_placeholder());
        assert_eq!(summary.name.as_deref(), Some("Documents"));
        assert!(summary.drive.is_some());
        assert_eq!(summary.stats.unwrap().total_size, 12);

        let missing = inspect(
            &temp_dir.path().join("nope"),
            AccessType::Read,
            &FolderAnalyzer::new(),
        );
        assert!(missing.is_placeholder());
        assert_eq!(missing, FolderSummary::placeholder());

        let empty = inspect(Path::new(""), AccessType::Read, &FolderAnalyzer::new());
        assert!(empty.is_placeholder());
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            analyzer_max_depth: 3,
            analyzer_workers: Some(2),
            ..Settings::default()
        };
        let analyzer = FolderAnalyzer::from_settings(&settings);
        assert_eq!(analyzer.max_depth(), 3);
        assert_eq!(FolderAnalyzer::new().max_depth(), DEFAULT_MAX_DEPTH);
    }
}
