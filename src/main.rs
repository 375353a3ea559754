use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use robotcopy::cli::{
    handle_analyze_command, handle_backup_command, handle_config_command, handle_history_command,
    AnalyzeArgs, BackupCommands, ConfigArgs, HistoryCommands, TerminalPrompt,
};
use robotcopy::config::AppPaths;
use robotcopy::storage::{CompatibilityGate, GateOutcome};

#[derive(Parser)]
#[command(
    name = "robotcopy",
    author = "matkeg",
    version,
    about = "Personal backup scheduler",
    long_about = "RobotCopy keeps a catalog of backup definitions (what to copy, where \
                  to, and when), records the outcome of every backup run, and analyzes \
                  folders before they are used as backup targets."
)]
struct Cli {
    /// Installation root holding all saved data
    #[arg(long, global = true, value_name = "DIR", env = "ROBOTCOPY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Answer yes when asked to delete data saved by an incompatible version
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a folder: size, file and folder counts
    Analyze(AnalyzeArgs),

    /// Backup definition commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Backup history commands
    #[command(subcommand)]
    History(HistoryCommands),

    /// Show or change configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("RobotCopy - personal backup scheduler");
        println!();
        println!("Run 'robotcopy --help' for usage information.");
        return Ok(());
    };

    let paths = match cli.data_dir {
        Some(dir) => AppPaths::with_base_dir(dir),
        None => AppPaths::new()?,
    };

    // Nothing touches saved data before the gate resolves
    let mut workspace = CompatibilityGate::new(paths).open(&TerminalPrompt::new(cli.yes))?;
    if let GateOutcome::Reset { .. } = workspace.outcome() {
        println!("Saved data was reset.");
        println!();
    }

    match command {
        Commands::Analyze(args) => handle_analyze_command(&workspace, args)?,
        Commands::Backup(cmd) => handle_backup_command(&workspace, cmd)?,
        Commands::History(cmd) => handle_history_command(&workspace, cmd)?,
        Commands::Config(args) => handle_config_command(&mut workspace, args)?,
    }

    Ok(())
}
