//! Folder summary display formatting

use crate::fs::{AnalysisIssue, FolderSummary};

use super::format_storage_size;

const UNKNOWN: &str = "Unknown";

/// Format a folder summary; unknown fields print as "Unknown"
pub fn format_folder_summary(summary: &FolderSummary) -> String {
    let path = summary
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let name = summary.name.as_deref().unwrap_or(UNKNOWN);
    let drive = summary.drive.as_deref().unwrap_or("?:");

    let (size, files, folders) = match &summary.stats {
        Some(stats) => (
            format_storage_size(stats.total_size),
            stats.file_count.to_string(),
            stats.folder_count.to_string(),
        ),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    let mut output = String::new();
    output.push_str(&format!("Folder:  {}\n", name));
    output.push_str(&format!("Path:    {}\n", path));
    output.push_str(&format!("Drive:   {}\n", drive));
    output.push_str(&format!("Size:    {}\n", size));
    output.push_str(&format!("Files:   {}\n", files));
    output.push_str(&format!("Folders: {}\n", folders));
    if summary.issue_count > 0 {
        output.push_str(&format!(
            "Skipped: {} inaccessible entr{}\n",
            summary.issue_count,
            if summary.issue_count == 1 { "y" } else { "ies" }
        ));
    }
    output
}

/// Format the entries an analysis could not count
pub fn format_analysis_issues(issues: &[AnalysisIssue]) -> String {
    let mut output = String::new();
    for issue in issues {
        output.push_str(&format!("  {}: {}\n", issue.path.display(), issue.message));
    }
    output
}
