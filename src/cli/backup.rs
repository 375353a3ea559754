//! Backup CLI commands
//!
//! Implements CLI commands for managing backup definitions.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDateTime, TimeZone};
use clap::{Args, Subcommand};

use crate::display::{format_backup_details, format_backup_list, format_history_list};
use crate::error::{RobotCopyError, RobotCopyResult};
use crate::models::{BackupDraft, BackupId, RecurrenceKind, StepUnit, TriggerKind, Weekday};
use crate::services::SetupService;
use crate::storage::Workspace;

/// Schedule options shared by create and edit
#[derive(Args, Debug, Default)]
pub struct ScheduleArgs {
    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
    /// When to run (never, startup, scheduled, logon)
    #[arg(short, long)]
    pub trigger: Option<String>,
    /// First run, as "YYYY-MM-DD HH:MM" local time or a Unix timestamp (0 = as soon as possible)
    #[arg(short, long)]
    pub start: Option<String>,
    /// Repeat kind (recurring, single)
    #[arg(short, long)]
    pub recurrence: Option<String>,
    /// Unit of the repeat step (days, weeks)
    #[arg(short, long)]
    pub unit: Option<String>,
    /// Repeat every N units
    #[arg(long)]
    pub every: Option<u32>,
    /// Weekday to run on when repeating weekly (repeatable)
    #[arg(short, long = "weekday")]
    pub weekdays: Vec<String>,
    /// Skip the read/write probes on origin and destination
    #[arg(long)]
    pub no_access_check: bool,
}

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup definition
    Create {
        /// Folder to back up
        origin: String,
        /// Folder to back up into
        destination: String,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },

    /// List all backup definitions
    List,

    /// Show a backup definition and its history
    Show {
        /// Backup ID
        id: BackupId,
    },

    /// Edit a backup definition; unspecified fields keep their value
    Edit {
        /// Backup ID
        id: BackupId,
        /// New folder to back up
        #[arg(long)]
        origin: Option<String>,
        /// New folder to back up into
        #[arg(long)]
        destination: Option<String>,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },

    /// Remove a backup definition
    Remove {
        /// Backup ID
        id: BackupId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(workspace: &Workspace, cmd: BackupCommands) -> RobotCopyResult<()> {
    match cmd {
        BackupCommands::Create {
            origin,
            destination,
            schedule,
        } => {
            let mut draft = BackupDraft::new(origin, destination);
            apply_schedule(&mut draft, &schedule)?;

            let definition = service(workspace, &schedule).create(draft)?;
            println!("Created backup #{}: {}", definition.id, definition.plan.name);
            print!("{}", format_backup_details(&definition));
        }

        BackupCommands::List => {
            let definitions = workspace.catalog().list()?;
            print!("{}", format_backup_list(&definitions));
            if definitions.is_empty() {
                println!();
                println!("Create one with: robotcopy backup create <ORIGIN> <DESTINATION>");
            }
        }

        BackupCommands::Show { id } => {
            let definition = workspace.catalog().get(id)?;
            print!("{}", format_backup_details(&definition));

            let history = workspace.history().for_backup(id)?;
            println!();
            println!("History:");
            println!("{}", format_history_list(&history));
        }

        BackupCommands::Edit {
            id,
            origin,
            destination,
            schedule,
        } => {
            let current = workspace.catalog().get(id)?;
            let mut draft = BackupDraft::from(&current.plan);
            if let Some(origin) = origin {
                draft.origin = origin;
            }
            if let Some(destination) = destination {
                draft.destination = destination;
            }
            apply_schedule(&mut draft, &schedule)?;

            let definition = service(workspace, &schedule).edit(id, draft)?;
            println!("Updated backup #{}: {}", definition.id, definition.plan.name);
            print!("{}", format_backup_details(&definition));
        }

        BackupCommands::Remove { id, force } => {
            let definition = workspace.catalog().get(id)?;

            if !force {
                let question = format!("Remove backup #{} ({})?", id, definition.plan.name);
                if !super::confirm(&question)? {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            workspace.catalog().remove(id)?;
            println!("Removed backup #{}: {}", id, definition.plan.name);
        }
    }

    Ok(())
}

fn service<'a>(workspace: &'a Workspace, schedule: &ScheduleArgs) -> SetupService<'a> {
    let service = SetupService::new(workspace);
    if schedule.no_access_check {
        service.without_access_probes()
    } else {
        service
    }
}

/// Copy the options that were given onto `draft`
fn apply_schedule(draft: &mut BackupDraft, schedule: &ScheduleArgs) -> RobotCopyResult<()> {
    if let Some(name) = &schedule.name {
        draft.name = Some(name.clone());
    }
    if let Some(trigger) = &schedule.trigger {
        draft.trigger = Some(TriggerKind::parse(trigger).ok_or_else(|| {
            invalid("trigger", trigger, "never, startup, scheduled, logon")
        })?);
    }
    if let Some(start) = &schedule.start {
        draft.start_time = Some(parse_start(start)?);
    }
    if let Some(recurrence) = &schedule.recurrence {
        draft.recurrence = Some(
            RecurrenceKind::parse(recurrence)
                .ok_or_else(|| invalid("recurrence", recurrence, "recurring, single"))?,
        );
    }
    if let Some(unit) = &schedule.unit {
        draft.step_unit =
            Some(StepUnit::parse(unit).ok_or_else(|| invalid("unit", unit, "days, weeks"))?);
    }
    if let Some(every) = schedule.every {
        draft.step = Some(every);
    }
    if !schedule.weekdays.is_empty() {
        draft.weekdays = schedule
            .weekdays
            .iter()
            .map(|day| {
                Weekday::parse(day).ok_or_else(|| invalid("weekday", day, "monday .. sunday"))
            })
            .collect::<RobotCopyResult<BTreeSet<_>>>()?;
    }
    Ok(())
}

fn parse_start(input: &str) -> RobotCopyResult<i64> {
    if let Ok(timestamp) = input.trim().parse::<i64>() {
        return Ok(timestamp);
    }

    let naive = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M")
        .map_err(|_| invalid("start time", input, "\"YYYY-MM-DD HH:MM\" or a Unix timestamp"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|instant| instant.timestamp())
        .ok_or_else(|| {
            RobotCopyError::Validation(format!("Start time '{}' does not exist locally", input))
        })
}

fn invalid(what: &str, value: &str, valid: &str) -> RobotCopyError {
    RobotCopyError::Validation(format!(
        "Invalid {}: '{}'. Valid values: {}",
        what, value, valid
    ))
}
