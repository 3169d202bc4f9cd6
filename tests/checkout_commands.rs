use assert_fs::TempDir;
use common::command::{
    branch_commit_id, commit_file, head_commit_id, log_commit_ids, repository_with_file,
    run_twig_command, twig_output,
};
use common::file::{FileSpec, read_file, write_file};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn checkout_restores_a_file_from_an_abbreviated_commit(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    let first = head_commit_id(dir);
    commit_file(dir, "f.txt", "second version\n", "rewrite f");

    run_twig_command(dir, &["checkout", &first[..8], "--", "f.txt"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(&dir.join("f.txt")), "hello\n");
    assert_eq!(head_commit_id(dir), log_commit_ids(dir)[0]);
}

#[rstest]
fn checkout_from_an_unknown_commit_is_rejected(repository_with_file: TempDir) {
    run_twig_command(
        repository_with_file.path(),
        &["checkout", "0123456789abcdef", "--", "f.txt"],
    )
    .assert()
    .success()
    .stdout("No commit with that id exists.\n");
}

#[rstest]
fn checkout_of_a_file_the_commit_lacks_is_rejected(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    let head = head_commit_id(dir);

    run_twig_command(dir, &["checkout", &head, "--", "g.txt"])
        .assert()
        .success()
        .stdout("File does not exist in that commit.\n");
}

#[rstest]
fn checkout_of_a_missing_branch_is_rejected(repository_with_file: TempDir) {
    run_twig_command(repository_with_file.path(), &["checkout", "nowhere"])
        .assert()
        .success()
        .stdout("No such branch exists.\n");
}

#[rstest]
fn checkout_of_the_current_branch_is_rejected(repository_with_file: TempDir) {
    run_twig_command(repository_with_file.path(), &["checkout", "master"])
        .assert()
        .success()
        .stdout("No need to checkout the current branch.\n");
}

#[rstest]
fn checkout_branch_replaces_the_tracked_files(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    run_twig_command(dir, &["branch", "feature"]).assert().success();
    commit_file(dir, "g.txt", "only on master\n", "add g");
    commit_file(dir, "f.txt", "master version\n", "rewrite f");

    run_twig_command(dir, &["checkout", "feature"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(&dir.join("f.txt")), "hello\n");
    assert!(!dir.join("g.txt").exists());
    assert_eq!(head_commit_id(dir), branch_commit_id(dir, "feature"));
    assert!(twig_output(dir, &["status"]).starts_with("=== Branches ===\n*feature\nmaster\n\n"));

    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(&dir.join("f.txt")), "master version\n");
    assert_eq!(read_file(&dir.join("g.txt")), "only on master\n");
}

#[rstest]
fn checkout_branch_clears_the_staging_area(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    run_twig_command(dir, &["branch", "feature"]).assert().success();
    write_file(FileSpec::new(dir.join("staged.txt"), "staged\n".to_string()));
    run_twig_command(dir, &["add", "staged.txt"]).assert().success();

    run_twig_command(dir, &["checkout", "feature"]).assert().success();

    let status = twig_output(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\nstaged.txt\n"));
}

#[rstest]
fn untracked_file_in_the_way_blocks_checkout(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    run_twig_command(dir, &["branch", "feature"]).assert().success();
    run_twig_command(dir, &["checkout", "feature"]).assert().success();
    commit_file(dir, "g.txt", "tracked on feature\n", "add g");
    run_twig_command(dir, &["checkout", "master"]).assert().success();
    write_file(FileSpec::new(dir.join("g.txt"), "precious\n".to_string()));

    run_twig_command(dir, &["checkout", "feature"])
        .assert()
        .success()
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    assert_eq!(read_file(&dir.join("g.txt")), "precious\n");
    assert!(twig_output(dir, &["status"]).starts_with("=== Branches ===\nfeature\n*master\n"));
}

#[rstest]
fn reset_moves_the_branch_and_the_files(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    let first = head_commit_id(dir);
    commit_file(dir, "g.txt", "later\n", "add g");
    commit_file(dir, "f.txt", "later\n", "rewrite f");

    run_twig_command(dir, &["reset", &first[..10]])
        .assert()
        .success()
        .stdout("");

    assert_eq!(head_commit_id(dir), first);
    assert_eq!(read_file(&dir.join("f.txt")), "hello\n");
    assert!(!dir.join("g.txt").exists());
    assert_eq!(log_commit_ids(dir).len(), 2);
}

#[rstest]
fn reset_to_an_unknown_commit_is_rejected(repository_with_file: TempDir) {
    let dir = repository_with_file.path();
    let head = head_commit_id(dir);

    run_twig_command(dir, &["reset", "fffffffffffffffffff"])
        .assert()
        .success()
        .stdout("No commit with that id exists.\n");

    assert_eq!(head_commit_id(dir), head);
}
