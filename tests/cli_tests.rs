use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn dupsweep(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dupsweep").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("DUPSWEEP_CONFIG")
        .arg("--hash-strategy")
        .arg("builtin");
    cmd
}

fn tree() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("keep")).unwrap();
    fs::create_dir(dir.path().join("old")).unwrap();
    fs::write(dir.path().join("keep/a.txt"), "same").unwrap();
    fs::write(dir.path().join("old/a.txt"), "same").unwrap();
    dir
}

#[test]
fn test_help_mentions_really_delete() {
    Command::cargo_bin("dupsweep")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--reallyDelete"));
}

#[test]
fn test_missing_directory_argument_fails() {
    Command::cargo_bin("dupsweep").unwrap().assert().failure();
}

#[test]
fn test_listing_is_a_dry_run() {
    let dir = tree();
    let home = tempdir().unwrap();

    dupsweep(home.path())
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 identical files"))
        .stdout(predicate::str::contains(
            "Number of files that would have been deleted with --reallyDelete: 0",
        ))
        .stdout(predicate::str::ends_with("Done!\n"));

    assert!(dir.path().join("old/a.txt").exists());
}

#[test]
fn test_auto_delete_dry_run_then_real() {
    let dir = tree();
    let home = tempdir().unwrap();
    let old = dir.path().join("old");

    dupsweep(home.path())
        .arg(dir.path().join("keep"))
        .arg("--auto-delete")
        .arg(&old)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would have deleted"))
        .stdout(predicate::str::contains(
            "Number of files that would have been deleted with --reallyDelete: 1",
        ));
    assert!(old.join("a.txt").exists());

    dupsweep(home.path())
        .arg(dir.path().join("keep"))
        .arg("--auto-delete")
        .arg(&old)
        .arg("--reallyDelete")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleting"))
        .stdout(predicate::str::contains("Number of files deleted: 1"));
    assert!(!old.join("a.txt").exists());
    assert!(dir.path().join("keep/a.txt").exists());
}

#[test]
fn test_quit_at_prompt_exits_cleanly() {
    let dir = tree();
    let home = tempdir().unwrap();

    dupsweep(home.path())
        .arg(dir.path())
        .arg("-i")
        .arg("--reallyDelete")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exiting"))
        .stdout(predicate::str::contains("Done!").not());

    assert!(dir.path().join("keep/a.txt").exists());
    assert!(dir.path().join("old/a.txt").exists());
}

#[test]
fn test_answer_yes_deletes_one_copy() {
    let dir = tree();
    let home = tempdir().unwrap();

    dupsweep(home.path())
        .arg(dir.path())
        .arg("--interactive")
        .arg("--really-delete")
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Number of files deleted: 1"));

    let survivors = ["keep/a.txt", "old/a.txt"]
        .iter()
        .filter(|rel| dir.path().join(rel).exists())
        .count();
    assert_eq!(survivors, 1);
}

#[test]
fn test_nonexistent_directory_is_skipped() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();

    dupsweep(home.path())
        .arg(dir.path().join("nope"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Done!"));
}
