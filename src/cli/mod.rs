//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service and storage layers.

pub mod analyze;
pub mod backup;
pub mod config;
pub mod history;

use std::io::{self, Write};

use crate::storage::ResetPrompt;

pub use analyze::{handle_analyze_command, AnalyzeArgs};
pub use backup::{handle_backup_command, BackupCommands};
pub use config::{handle_config_command, ConfigArgs};
pub use history::{handle_history_command, HistoryCommands};

/// Ask a yes/no question on stdout; anything but "yes" is a no
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{} (yes/no): ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

/// Reset prompt answered on the terminal, or up front with `--yes`
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ResetPrompt for TerminalPrompt {
    fn confirm_reset(&self, stored: Option<u32>, expected: u32) -> bool {
        let stored = stored
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "Saved data was written by an incompatible version of RobotCopy \
             (stored format {}, this version uses {}).",
            stored, expected
        );
        println!("Continuing deletes every saved backup definition and all history.");

        if self.assume_yes {
            println!("Deleting saved data (--yes given).");
            return true;
        }
        match confirm("Delete all saved data and continue?") {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "could not read reset confirmation");
                false
            }
        }
    }
}
