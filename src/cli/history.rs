//! History CLI commands

use chrono::Utc;
use clap::Subcommand;

use crate::display::format_history_list;
use crate::error::{RobotCopyError, RobotCopyResult};
use crate::models::{BackupHistoryEntry, BackupId, OperationGroup, OperationResult};
use crate::storage::Workspace;

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List recorded backup runs, oldest first
    List {
        /// Only runs of this backup
        #[arg(short, long)]
        backup: Option<BackupId>,
    },

    /// Record the outcome of a backup run
    Record {
        /// Backup ID
        id: BackupId,
        /// Outcome (success, origin-missing, destination-missing, nested,
        /// identical, illegal-parameters, interrupted, other)
        #[arg(short, long, default_value = "success")]
        result: String,
        /// Batch the run belonged to (unknown, startup, logon, alone)
        #[arg(short, long, default_value = "alone")]
        group: String,
    },

    /// Delete all recorded history
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a history command
pub fn handle_history_command(workspace: &Workspace, cmd: HistoryCommands) -> RobotCopyResult<()> {
    let ledger = workspace.history();

    match cmd {
        HistoryCommands::List { backup } => {
            let entries = match backup {
                Some(id) => ledger.for_backup(id)?,
                None => ledger.list()?,
            };
            println!("{}", format_history_list(&entries));
        }

        HistoryCommands::Record { id, result, group } => {
            let result = OperationResult::parse(&result).ok_or_else(|| {
                RobotCopyError::Validation(format!("Invalid operation result: '{}'", result))
            })?;
            let group = OperationGroup::parse(&group).ok_or_else(|| {
                RobotCopyError::Validation(format!("Invalid operation group: '{}'", group))
            })?;

            let definition = workspace.catalog().get(id)?;
            let entry = BackupHistoryEntry::record(&definition, Utc::now(), group, result);
            ledger.append(entry)?;

            println!("Recorded run of backup #{}: {}", id, result);
        }

        HistoryCommands::Clear { force } => {
            if !force && !super::confirm("Delete all backup history? This cannot be undone.")? {
                println!("Aborted.");
                return Ok(());
            }

            ledger.clear()?;
            println!("Backup history cleared.");
        }
    }

    Ok(())
}
