//! Backup definition display formatting
//!
//! Formats definitions for terminal output in table and detail views.

use crate::models::{BackupDefinition, StepUnit};

use super::{format_start_time, last_two_components};

/// Format a list of backup definitions as a table
pub fn format_backup_list(definitions: &[BackupDefinition]) -> String {
    if definitions.is_empty() {
        return "No backups found.".to_string();
    }

    let rows: Vec<[String; 5]> = definitions
        .iter()
        .map(|d| {
            [
                d.id.to_string(),
                d.plan.name.clone(),
                last_two_components(&d.plan.origin),
                last_two_components(&d.plan.destination),
                d.plan.trigger.short_label().to_string(),
            ]
        })
        .collect();

    let headers = ["ID", "Name", "Origin", "Destination", "Trigger"];
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
    output.push_str(&format!(
        "{:>w0$}  {:<w1$}  {:<w2$}  {:<w3$}  {}\n",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        headers[4],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
    output.push_str(&format!(
        "{:->w0$}  {:-<w1$}  {:-<w2$}  {:-<w3$}  {:-<w4$}\n",
        "",
        "",
        "",
        "",
        "",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    ));

    for row in &rows {
        output.push_str(&format!(
            "{:>w0$}  {:<w1$}  {:<w2$}  {:<w3$}  {}\n",
            row[0],
            row[1],
            row[2],
            row[3],
            row[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        ));
    }

    output.push_str(&format!("\n{} backup(s)\n", definitions.len()));
    output
}

/// Format a single definition with all of its fields
pub fn format_backup_details(definition: &BackupDefinition) -> String {
    let plan = &definition.plan;
    let mut output = String::new();

    output.push_str(&format!("Backup #{}: {}\n", definition.id, plan.name));
    output.push_str(&format!("  Origin:      {}\n", plan.origin.display()));
    output.push_str(&format!("  Destination: {}\n", plan.destination.display()));
    output.push_str(&format!("  Trigger:     {}\n", plan.trigger));
    output.push_str(&format!("  Start:       {}\n", format_start_time(plan.start_time)));
    output.push_str(&format!("  Recurrence:  {}\n", plan.recurrence));
    output.push_str(&format!("  Every:       {} {}\n", plan.step, plan.step_unit));

    if plan.step_unit == StepUnit::Weeks {
        let days: Vec<String> = plan.weekdays.iter().map(|d| d.to_string()).collect();
        output.push_str(&format!("  On:          {}\n", days.join(", ")));
    }

    output
}
