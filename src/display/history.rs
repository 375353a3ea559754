//! History display formatting

use crate::models::BackupHistoryEntry;

use super::{format_timestamp, last_two_components};

/// Format history entries as a table, oldest first
pub fn format_history_list(entries: &[BackupHistoryEntry]) -> String {
    if entries.is_empty() {
        return "No backup history.".to_string();
    }

    let rows: Vec<[String; 6]> = entries
        .iter()
        .map(|e| {
            [
                e.name.clone(),
                format_timestamp(e.completed_at),
                last_two_components(&e.origin),
                last_two_components(&e.destination),
                e.operation_group.to_string(),
                e.operation_result.short_label().to_string(),
            ]
        })
        .collect();

    let headers = ["Name", "Completed", "Origin", "Destination", "Group", "Result"];
    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(headers[i].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    let mut push_row = |cells: [&str; 6]| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    };

    push_row(headers);
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row([
        &rules[0], &rules[1], &rules[2], &rules[3], &rules[4], &rules[5],
    ]);
    for row in &rows {
        push_row([&row[0], &row[1], &row[2], &row[3], &row[4], &row[5]]);
    }

    let failed = entries
        .iter()
        .filter(|e| !e.operation_result.is_success())
        .count();
    output.push_str(&format!("\n{} run(s), {} unsuccessful\n", entries.len(), failed));
    output
}
