//! Smoke tests for the `robotcopy` binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn robotcopy(install: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("robotcopy").unwrap();
    cmd.arg("--data-dir").arg(install.path());
    cmd.env_remove("ROBOTCOPY_DATA_DIR");
    cmd
}

#[test]
fn test_empty_list() {
    let install = TempDir::new().unwrap();

    robotcopy(&install)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found."));

    assert!(install.path().join("environment.json").exists());
}

#[test]
fn test_create_show_and_remove() {
    let install = TempDir::new().unwrap();
    let folders = TempDir::new().unwrap();
    let origin = folders.path().join("Documents");
    let destination = folders.path().join("Backup");
    fs::create_dir_all(&origin).unwrap();
    fs::create_dir_all(&destination).unwrap();

    robotcopy(&install)
        .args(["backup", "create"])
        .arg(&origin)
        .arg(&destination)
        .args(["--name", "Docs", "--trigger", "startup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created backup #1: Docs"));

    robotcopy(&install)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Docs").and(predicate::str::contains("STARTUP")));

    robotcopy(&install)
        .args(["history", "record", "1", "--result", "success"])
        .assert()
        .success();

    robotcopy(&install)
        .args(["backup", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("At Startup").and(predicate::str::contains("1 run(s)")));

    robotcopy(&install)
        .args(["backup", "remove", "1", "--force"])
        .assert()
        .success();

    robotcopy(&install)
        .args(["backup", "show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backup not found: 1"));
}

#[test]
fn test_identical_targets_rejected() {
    let install = TempDir::new().unwrap();
    let folders = TempDir::new().unwrap();

    robotcopy(&install)
        .args(["backup", "create"])
        .arg(folders.path())
        .arg(folders.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("same location"));

    assert!(!install.path().join("Backups").join("Backup1.rcbe").exists());
}

#[test]
fn test_declined_reset_exits_with_error() {
    let install = TempDir::new().unwrap();
    let env_path = install.path().join("environment.json");
    let stale = r#"{"FileStructureCompatibilityVersion": 999, "TotalBackups": 4}"#;
    fs::write(&env_path, stale).unwrap();

    robotcopy(&install)
        .args(["backup", "list"])
        .write_stdin("no\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incompatible"));

    assert_eq!(fs::read_to_string(&env_path).unwrap(), stale);
    assert!(!install.path().join("Backups").exists());
}

#[test]
fn test_yes_flag_resets() {
    let install = TempDir::new().unwrap();
    fs::write(
        install.path().join("environment.json"),
        r#"{"FileStructureCompatibilityVersion": 999}"#,
    )
    .unwrap();

    robotcopy(&install)
        .args(["--yes", "backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved data was reset."));
}

#[test]
fn test_analyze() {
    let install = TempDir::new().unwrap();
    let folder = TempDir::new().unwrap();
    fs::write(folder.path().join("a.bin"), vec![0u8; 2048]).unwrap();
    fs::create_dir(folder.path().join("sub")).unwrap();
    fs::write(folder.path().join("sub").join("b.bin"), vec![0u8; 1024]).unwrap();

    robotcopy(&install)
        .arg("analyze")
        .arg(folder.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Size:    3.00 KB")
                .and(predicate::str::contains("Files:   2"))
                .and(predicate::str::contains("Folders: 1")),
        );
}

#[test]
fn test_analyze_missing_folder_prints_placeholder() {
    let install = TempDir::new().unwrap();

    robotcopy(&install)
        .arg("analyze")
        .arg(install.path().join("missing"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Folder:  Unknown"));
}

#[test]
fn test_config_updates_settings() {
    let install = TempDir::new().unwrap();

    robotcopy(&install)
        .args(["config", "--default-name", "Nightly", "--max-depth", "4"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Default backup name: Nightly")
                .and(predicate::str::contains("Analyzer max depth:  4")),
        );
}
