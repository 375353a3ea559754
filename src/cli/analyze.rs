//! Folder analysis command

use std::path::PathBuf;

use clap::Args;

use crate::display::{format_analysis_issues, format_folder_summary};
use crate::error::{RobotCopyError, RobotCopyResult};
use crate::fs::{can_access, inspect, AccessType, FolderAnalyzer, FolderSummary};
use crate::storage::Workspace;

/// Arguments for `robotcopy analyze`
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Folder to analyze
    pub path: PathBuf,
    /// Access the folder must allow (read, write, both)
    #[arg(short, long, default_value = "read")]
    pub access: String,
    /// Depth budget (defaults to the configured value)
    #[arg(short = 'd', long)]
    pub max_depth: Option<u32>,
    /// Worker threads (defaults to the configured value)
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// List the entries that could not be counted
    #[arg(short, long)]
    pub verbose: bool,
}

/// Handle the analyze command
pub fn handle_analyze_command(workspace: &Workspace, args: AnalyzeArgs) -> RobotCopyResult<()> {
    let access = match args.access.to_lowercase().as_str() {
        "read" | "r" => AccessType::Read,
        "write" | "w" => AccessType::Write,
        "both" | "rw" | "read-and-write" => AccessType::ReadAndWrite,
        other => {
            return Err(RobotCopyError::Validation(format!(
                "Invalid access type: '{}'. Valid types: read, write, both",
                other
            )))
        }
    };

    let mut analyzer = FolderAnalyzer::from_settings(workspace.settings());
    if let Some(depth) = args.max_depth {
        analyzer = analyzer.with_max_depth(depth);
    }
    if let Some(workers) = args.workers {
        analyzer = analyzer.with_workers(workers);
    }

    if !args.verbose {
        print!("{}", format_folder_summary(&inspect(&args.path, access, &analyzer)));
        return Ok(());
    }

    if !can_access(&args.path, access) {
        print!("{}", format_folder_summary(&FolderSummary::placeholder()));
        return Ok(());
    }
    let report = analyzer.analyze_report(&args.path);
    print!(
        "{}",
        format_folder_summary(&FolderSummary::from_report(&args.path, &report))
    );

    if !report.issues.is_empty() {
        println!();
        println!("Not counted:");
        print!("{}", format_analysis_issues(&report.issues));
    }
    if !report.skipped_by_depth.is_empty() {
        println!();
        println!(
            "{} folder(s) beyond depth {} were not analyzed",
            report.skipped_by_depth.len(),
            analyzer.max_depth()
        );
    }
    if report.cancelled {
        println!("Analysis was cancelled; totals are incomplete.");
    }

    Ok(())
}
