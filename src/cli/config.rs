//! Configuration command
//!
//! Shows the installation paths and settings, and updates settings when any
//! option is given.

use clap::Args;

use crate::error::{RobotCopyError, RobotCopyResult};
use crate::storage::{Workspace, COMPATIBILITY_VERSION};

/// Arguments for `robotcopy config`
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Longest accepted backup name
    #[arg(long)]
    pub name_max_chars: Option<usize>,
    /// Name given to backups created without one
    #[arg(long)]
    pub default_name: Option<String>,
    /// Depth budget for folder analysis
    #[arg(long)]
    pub max_depth: Option<u32>,
    /// Worker threads for folder analysis (0 = available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,
}

impl ConfigArgs {
    fn is_empty(&self) -> bool {
        self.name_max_chars.is_none()
            && self.default_name.is_none()
            && self.max_depth.is_none()
            && self.workers.is_none()
    }
}

/// Handle the config command
pub fn handle_config_command(workspace: &mut Workspace, args: ConfigArgs) -> RobotCopyResult<()> {
    if !args.is_empty() {
        let mut settings = workspace.settings().clone();
        if let Some(max) = args.name_max_chars {
            if max == 0 {
                return Err(RobotCopyError::Validation(
                    "Name length limit must be at least 1".into(),
                ));
            }
            settings.name_max_chars = max;
        }
        if let Some(name) = args.default_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RobotCopyError::Validation(
                    "Default backup name cannot be empty".into(),
                ));
            }
            settings.default_backup_name = name;
        }
        if let Some(depth) = args.max_depth {
            settings.analyzer_max_depth = depth;
        }
        if let Some(workers) = args.workers {
            settings.analyzer_workers = (workers > 0).then_some(workers);
        }
        // Unnamed definitions take the default name
        let length = settings.default_backup_name.chars().count();
        if length > settings.name_max_chars {
            return Err(RobotCopyError::NameTooLong {
                length,
                max: settings.name_max_chars,
            });
        }
        workspace.update_settings(settings)?;
        println!("Settings updated.");
        println!();
    }

    let paths = workspace.paths();
    let settings = workspace.settings();
    let environment = workspace.environment();

    println!("RobotCopy Configuration");
    println!("=======================");
    println!("Data directory:    {}", paths.base_dir().display());
    println!("Backups directory: {}", paths.backups_dir().display());
    println!("Storage directory: {}", paths.storage_dir().display());
    println!("Logs directory:    {}", paths.logs_dir().display());
    println!("Data format:       {}", COMPATIBILITY_VERSION);
    println!(
        "Backups created:   {}",
        environment.get(crate::storage::environment::TOTAL_BACKUPS_KEY, 0)?
    );
    println!();
    println!("Settings:");
    println!("  Name max length:     {}", settings.name_max_chars);
    println!("  Default backup name: {}", settings.default_backup_name);
    println!("  Analyzer max depth:  {}", settings.analyzer_max_depth);
    match settings.analyzer_workers {
        Some(workers) => println!("  Analyzer workers:    {}", workers),
        None => println!("  Analyzer workers:    auto"),
    }

    Ok(())
}
