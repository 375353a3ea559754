//! Display formatting for terminal output
//!
//! Provides utilities for formatting backup definitions, history entries and
//! folder summaries for terminal display, plus the shared size and path
//! helpers they use.

pub mod backup;
pub mod folder;
pub mod history;

use std::path::{Component, Path};

use chrono::{DateTime, Local, Utc};

pub use backup::{format_backup_details, format_backup_list};
pub use folder::{format_analysis_issues, format_folder_summary};
pub use history::format_history_list;

const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count in the largest unit below 1024 (e.g. "1.50 KB")
pub fn format_storage_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} Bytes", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Last two components of a path, for narrow table columns
pub fn last_two_components(path: &Path) -> String {
    let names: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();

    if names.len() <= 2 {
        return path.display().to_string();
    }
    let sep = std::path::MAIN_SEPARATOR;
    format!(
        "...{sep}{}{sep}{}",
        names[names.len() - 2],
        names[names.len() - 1],
        sep = sep
    )
}

/// Format an instant in local time (e.g. "3/1/2025 8:05 AM")
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%-m/%-d/%Y %-I:%M %p")
        .to_string()
}

/// Format a Unix start time, 0 meaning as soon as possible
pub fn format_start_time(timestamp: i64) -> String {
    if timestamp == 0 {
        return "As soon as possible".to_string();
    }
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(instant) => format_timestamp(instant),
        None => timestamp.to_string(),
    }
}
