use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Timestamp given to every commit made through [`twig_commit`]
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000"; // %Y-%m-%d %H:%M:%S %z
pub const READABLE_COMMIT_DATE: &str = "Sun Jan 01 12:00:00 2023 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout("");

    repository_dir
}

/// A repository whose master holds `f.txt` = "hello\n" in one commit
#[fixture]
pub fn repository_with_file(init_repository_dir: TempDir) -> TempDir {
    commit_file(init_repository_dir.path(), "f.txt", "hello\n", "add f");

    init_repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.env("NO_PAGER", "1")
        .env("TWIG_COMMIT_DATE", COMMIT_DATE)
        .env_remove("TWIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Run a command that must succeed and return its stdout
pub fn twig_output(dir: &Path, args: &[&str]) -> String {
    let output = run_twig_command(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("twig printed invalid UTF-8")
}

/// Write, stage and commit a single file
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_twig_command(dir, &["add", name])
        .assert()
        .success()
        .stdout("");
    twig_commit(dir, message).assert().success().stdout("");
}

/// Id of the commit the current branch points at
pub fn head_commit_id(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".twig").join("HEAD")).expect("Failed to read HEAD");
    let branch = head
        .trim()
        .strip_prefix("ref: ")
        .expect("HEAD is not a branch reference");

    branch_commit_id(dir, branch.trim_start_matches("refs/heads/"))
}

pub fn branch_commit_id(dir: &Path, branch: &str) -> String {
    let ref_path = branch
        .split('/')
        .fold(dir.join(".twig").join("refs").join("heads"), |path, part| {
            path.join(part)
        });

    std::fs::read_to_string(ref_path)
        .expect("Failed to read branch")
        .trim()
        .to_string()
}

/// Ids of every commit shown by `log`, newest first
pub fn log_commit_ids(dir: &Path) -> Vec<String> {
    twig_output(dir, &["log"])
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}
