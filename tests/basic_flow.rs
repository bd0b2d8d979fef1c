use predicates::prelude::*;

mod common;
use common::*;

#[test]
fn init_twice() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    twig(dir, &["init"]).success().stdout("");
    assert!(dir.join(".twig/objects").is_dir());

    twig(dir, &["init"])
        .success()
        .stdout("A twig version-control system already exists in the current directory.\n");
}

#[test]
fn user_errors_exit_successfully() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    twig(dir, &["status"])
        .success()
        .stdout("Not in an initialized twig directory.\n")
        .stderr("");
}

#[test]
fn missing_and_unknown_commands() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    twig(dir, &[])
        .success()
        .stdout("Please enter a command.\n")
        .stderr("");
    twig(dir, &["frobnicate"])
        .success()
        .stdout("No command with that name exists.\n")
        .stderr("");
    twig(dir, &["-v", "comit", "message"])
        .success()
        .stdout("No command with that name exists.\n");
}

#[test]
fn storage_errors_exit_with_failure() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    twig(dir, &["init"]).success();
    std::fs::write(dir.join(".twig/staging"), "{ not json").unwrap();

    twig(dir, &["status"])
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("ERROR: "));
}

#[test]
fn add_commit_rm_cycle() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    twig(dir, &["init"]).success();
    commit_file(dir, "a.txt", "hello", "add a");

    twig(dir, &["rm", "a.txt"]).success().stdout("");
    assert!(!dir.join("a.txt").exists());
    twig(dir, &["commit", "remove a"]).success().stdout("");

    assert_eq!(
        log_messages(dir),
        vec!["remove a", "add a", "initial commit"]
    );

    let found = twig_out(dir, &["find", "add a"]);
    let id = found.trim();
    twig(dir, &["checkout", id, "--", "a.txt"]).success().stdout("");
    assert_eq!(read(dir, "a.txt"), "hello");

    twig(dir, &["status"])
        .success()
        .stdout(predicate::str::ends_with("=== Untracked Files ===\na.txt\n\n"));
}

#[test]
fn work_tree_flag() {
    let temp = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let dir = temp.path().to_str().unwrap();

    twig(elsewhere.path(), &["-C", dir, "init"]).success();
    assert!(temp.path().join(".twig").is_dir());
    assert!(!elsewhere.path().join(".twig").exists());

    let mut cmd = assert_cmd::Command::cargo_bin("twig").unwrap();
    cmd.current_dir(elsewhere.path())
        .env("TWIG_WORK_TREE", dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== Branches ===\n*master\n"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    twig(dir, &["init"]).success();
    write(dir, "a.txt", "hello");
    twig(dir, &["add", "a.txt"]).success();

    twig(dir, &["-vv", "commit", "add a"])
        .success()
        .stdout("")
        .stderr(predicate::str::contains("committed"));
}
