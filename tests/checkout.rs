use crate::common::repository::{TestRepository, linear_history, test_repository};
use gitlet::errors::GitletError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

mod common;

#[rstest]
fn branch_points_at_head(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    let oid = repository.branch("feat").unwrap();

    assert_eq!(oid, linear_history.head());
    let branches = repository.branches().unwrap();
    assert_eq!(
        branches
            .iter()
            .map(|branch| (branch.name.as_ref(), branch.is_active))
            .collect::<Vec<_>>(),
        vec![("feat", false), ("master", true)]
    );
}

#[rstest]
fn branch_names_must_be_unique_and_valid(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    assert!(matches!(
        repository.branch("master"),
        Err(GitletError::BranchAlreadyExists(_))
    ));
    assert!(matches!(
        repository.branch("bad..name"),
        Err(GitletError::InvalidBranchName(_))
    ));
    assert!(matches!(
        repository.branch("HEAD"),
        Err(GitletError::InvalidBranchName(_))
    ));
    assert!(!linear_history.exists(".gitlet/refs/heads/HEAD"));
}

#[rstest]
fn remove_branch_keeps_the_commits(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    repository.branch("feat").unwrap();

    assert!(matches!(
        repository.remove_branch("master"),
        Err(GitletError::CannotRemoveActiveBranch)
    ));
    assert!(matches!(
        repository.remove_branch("nope"),
        Err(GitletError::NoSuchBranch(_))
    ));

    let removed = repository.remove_branch("feat").unwrap();
    assert!(repository.database().exists(&removed));
    assert_eq!(repository.branches().unwrap().len(), 1);
}

#[rstest]
fn checkout_switches_the_working_tree(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    repository.branch("feat").unwrap();
    repository.checkout("feat").unwrap();
    linear_history.commit_file("b.txt", "B1\n", "add b on feat");
    linear_history.commit_file("a.txt", "A2\n", "edit a on feat");

    repository.checkout("master").unwrap();

    assert_eq!(linear_history.read("a.txt"), "A1\n");
    assert!(!linear_history.exists("b.txt"));
    assert_eq!(
        repository.refs().active_branch().unwrap().unwrap().as_ref(),
        "master"
    );

    repository.checkout("feat").unwrap();
    assert_eq!(linear_history.read("a.txt"), "A2\n");
    assert_eq!(linear_history.read("b.txt"), "B1\n");
}

#[rstest]
fn checkout_clears_the_staging_area(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    repository.branch("feat").unwrap();

    linear_history.write("staged.txt", "staged\n");
    repository.add("staged.txt").unwrap();
    repository.checkout("feat").unwrap();

    let status = repository.status().unwrap();
    assert!(status.staged_files.is_empty());
    assert!(status.untracked_files.contains("staged.txt"));
}

#[rstest]
fn checkout_rejects_unknown_and_active_branches(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    assert!(matches!(
        repository.checkout("nope"),
        Err(GitletError::NoSuchBranch(_))
    ));
    assert!(matches!(
        repository.checkout("master"),
        Err(GitletError::NoOpCheckoutOfActiveBranch)
    ));
}

#[rstest]
fn checkout_refuses_to_overwrite_untracked_files(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    repository.branch("feat").unwrap();
    repository.checkout("feat").unwrap();
    linear_history.commit_file("b.txt", "B1\n", "add b on feat");
    repository.checkout("master").unwrap();

    linear_history.write("b.txt", "precious\n");
    let master_head = linear_history.head();

    let result = repository.checkout("feat");

    assert!(matches!(
        result,
        Err(GitletError::UntrackedFileWouldBeOverwritten(paths)) if paths == vec![PathBuf::from("b.txt")]
    ));
    assert_eq!(linear_history.read("b.txt"), "precious\n");
    assert_eq!(linear_history.head(), master_head);
    assert_eq!(
        repository.refs().active_branch().unwrap().unwrap().as_ref(),
        "master"
    );
}

#[rstest]
fn checkout_refuses_to_replace_a_directory_holding_untracked_files(
    linear_history: TestRepository,
) {
    let repository = &linear_history.repository;
    repository.branch("feat").unwrap();
    repository.checkout("feat").unwrap();
    linear_history.commit_file("d", "a file named d\n", "add d on feat");
    repository.checkout("master").unwrap();

    linear_history.write("d/notes.txt", "precious\n");
    let master_head = linear_history.head();

    assert!(matches!(
        repository.checkout("feat"),
        Err(GitletError::UntrackedFileWouldBeOverwritten(paths)) if paths == vec![PathBuf::from("d/notes.txt")]
    ));
    assert!(matches!(
        repository.reset("feat"),
        Err(GitletError::UntrackedFileWouldBeOverwritten(_))
    ));
    assert_eq!(linear_history.read("d/notes.txt"), "precious\n");
    assert_eq!(linear_history.head(), master_head);
}

#[rstest]
fn checkout_path_restores_committed_bytes(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let first = linear_history.head();
    linear_history.commit_file("a.txt", "A2\n", "edit a");

    linear_history.write("a.txt", "scratch\n");
    repository.checkout_path(None, "a.txt").unwrap();
    assert_eq!(linear_history.read("a.txt"), "A2\n");

    repository
        .checkout_path(Some(&first.as_ref()[..8]), "a.txt")
        .unwrap();
    assert_eq!(linear_history.read("a.txt"), "A1\n");

    let status = repository.status().unwrap();
    assert!(status.staged_files.is_empty());
}

#[rstest]
fn checkout_path_reports_missing_files_and_commits(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    assert!(matches!(
        repository.checkout_path(None, "missing.txt"),
        Err(GitletError::FileNotTrackedInCommit(_))
    ));
    assert!(matches!(
        repository.checkout_path(Some("0000000000"), "a.txt"),
        Err(GitletError::NoSuchCommit(_))
    ));
}

#[rstest]
fn reset_moves_the_active_branch(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let c1 = linear_history.head();
    linear_history.commit_file("b.txt", "B1\n", "add b");
    linear_history.commit_file("a.txt", "A2\n", "edit a");

    repository.reset(c1.as_ref()).unwrap();

    assert_eq!(linear_history.head(), c1);
    assert_eq!(
        repository.refs().active_branch().unwrap().unwrap().as_ref(),
        "master"
    );
    assert_eq!(linear_history.read("a.txt"), "A1\n");
    assert!(!linear_history.exists("b.txt"));
}

#[rstest]
fn reset_accepts_relative_revisions(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let c1 = linear_history.head();
    linear_history.commit_file("a.txt", "A2\n", "edit a");
    linear_history.commit_file("a.txt", "A3\n", "edit a again");

    repository.reset("HEAD~2").unwrap();

    assert_eq!(linear_history.head(), c1);
}

#[rstest]
fn initial_commit_is_reachable_from_every_branch(test_repository: TestRepository) {
    let repository = &test_repository.repository;
    let initial = test_repository.head();
    repository.branch("other").unwrap();

    assert_eq!(repository.refs().read_head().unwrap(), Some(initial));
}
