use std::{fs, path::Path};

use assert_cmd::{assert::Assert, Command};

/// Runs the `twig` binary with `dir` as its working directory.
pub fn twig(dir: &Path, args: &[&str]) -> Assert {
    Command::cargo_bin("twig")
        .unwrap()
        .current_dir(dir)
        .env_remove("TWIG_WORK_TREE")
        .env_remove("RUST_LOG")
        .args(args)
        .assert()
}

/// Runs `twig` and returns its stdout, checking that it succeeded.
pub fn twig_out(dir: &Path, args: &[&str]) -> String {
    let output = twig(dir, args).success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

pub fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[allow(dead_code)]
pub fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

/// Writes, adds, and commits a single file.
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write(dir, name, content);
    twig(dir, &["add", name]).success().stdout("");
    twig(dir, &["commit", message]).success().stdout("");
}

/// Commit messages shown by `log`, newest first.
pub fn log_messages(dir: &Path) -> Vec<String> {
    twig_out(dir, &["log"])
        .split("===\n")
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| entry.trim_end().lines().last().map(str::to_string))
        .collect()
}

/// The head commit ID, read from the first `log` entry.
#[allow(dead_code)]
pub fn head_id(dir: &Path) -> String {
    let log = twig_out(dir, &["log"]);
    log["===\ncommit ".len()..]
        .lines()
        .next()
        .unwrap()
        .to_string()
}
