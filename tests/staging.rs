use crate::common::command::repository_dir;
use crate::common::repository::{TestRepository, linear_history, test_repository};
use assert_fs::TempDir;
use gitlet::areas::repository::Repository;
use gitlet::commands::porcelain::add::AddOutcome;
use gitlet::errors::GitletError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_the_initial_commit(test_repository: TestRepository) {
    let (_, initial) = test_repository.repository.head_commit().unwrap();

    assert_eq!(initial.message(), "initial commit");
    assert!(initial.parents().is_empty());
    assert!(initial.tree().is_empty());
    assert_eq!(initial.timestamp().timestamp(), 0);
    assert!(test_repository.dir.path().join(".gitlet").is_dir());
}

#[rstest]
fn init_twice_fails(test_repository: TestRepository) {
    assert!(matches!(
        test_repository.repository.init(),
        Err(GitletError::AlreadyInitialized)
    ));
}

#[rstest]
fn operations_outside_a_repository_fail(repository_dir: TempDir) {
    let repository = Repository::new(repository_dir.path()).unwrap();

    assert!(matches!(
        repository.commit("message"),
        Err(GitletError::NotInitialized)
    ));
    assert!(matches!(repository.log(), Err(GitletError::NotInitialized)));
}

#[rstest]
fn add_of_a_missing_file_fails(test_repository: TestRepository) {
    assert!(matches!(
        test_repository.repository.add("missing.txt"),
        Err(GitletError::FileNotFound(_))
    ));
}

#[rstest]
fn opening_a_missing_directory_creates_nothing_until_init(repository_dir: TempDir) {
    let path = repository_dir.path().join("not-yet");
    let repository = Repository::new(&path).unwrap();

    assert!(matches!(repository.status(), Err(GitletError::NotInitialized)));
    assert!(!path.exists());

    repository.init().unwrap();
    assert!(path.join(".gitlet").is_dir());
}

#[rstest]
fn paths_are_staged_under_their_tree_key(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    assert_eq!(repository.add("./a.txt").unwrap(), AddOutcome::Unchanged);

    linear_history.write("dir/b.txt", "B1\n");
    let absolute = repository.path().join("dir/b.txt");
    repository.add(absolute.to_str().unwrap()).unwrap();
    repository.add("dir/./b.txt").unwrap();

    let status = repository.status().unwrap();
    assert_eq!(status.staged_files.iter().collect::<Vec<_>>(), vec!["dir/b.txt"]);

    repository.commit("nested").unwrap();
    let (_, head) = repository.head_commit().unwrap();
    assert_eq!(head.tree().keys().collect::<Vec<_>>(), vec!["a.txt", "dir/b.txt"]);
}

#[rstest]
#[case::metadata(".gitlet/HEAD")]
#[case::parent_dir("../a.txt")]
#[case::climbing_back("dir/../a.txt")]
fn paths_outside_the_working_tree_cannot_be_staged(
    linear_history: TestRepository,
    #[case] file_path: &str,
) {
    let repository = &linear_history.repository;

    assert!(matches!(
        repository.add(file_path),
        Err(GitletError::InvalidPath(_))
    ));
    assert!(matches!(
        repository.rm(file_path),
        Err(GitletError::InvalidPath(_))
    ));
    assert!(repository.status().unwrap().staged_files.is_empty());
}

#[rstest]
fn file_names_with_line_breaks_are_refused(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let head = linear_history.head();
    linear_history.write("a\nb", "content\n");

    assert!(matches!(
        repository.add("a\nb"),
        Err(GitletError::InvalidPath(path)) if path == "a\nb"
    ));

    let status = repository.status().unwrap();
    assert!(status.staged_files.is_empty());
    assert!(status.untracked_files.contains("a\nb"));
    assert_eq!(linear_history.head(), head);
    assert!(repository.head_commit().is_ok());
}

#[rstest]
fn adding_committed_content_unstages_the_file(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    linear_history.write("a.txt", "changed\n");
    assert_eq!(repository.add("a.txt").unwrap(), AddOutcome::Staged);
    assert!(repository.status().unwrap().staged_files.contains("a.txt"));

    linear_history.write("a.txt", "A1\n");
    assert_eq!(repository.add("a.txt").unwrap(), AddOutcome::Unchanged);

    let status = repository.status().unwrap();
    assert!(status.staged_files.is_empty());
    assert!(status.unstaged_changes.is_empty());
}

#[rstest]
fn adding_a_removed_file_back_cancels_the_removal(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    repository.rm("a.txt").unwrap();
    assert!(!linear_history.exists("a.txt"));

    linear_history.write("a.txt", "A1\n");
    repository.add("a.txt").unwrap();

    let status = repository.status().unwrap();
    assert!(status.removed_files.is_empty());
    assert!(status.staged_files.is_empty());
}

#[rstest]
fn commit_builds_the_tree_from_the_staging_area(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    linear_history.write("b.txt", "B1\n");
    repository.add("b.txt").unwrap();
    repository.rm("a.txt").unwrap();
    let commit_id = repository.commit("swap files").unwrap();

    let (head_oid, head) = repository.head_commit().unwrap();
    assert_eq!(head_oid, commit_id);
    assert_eq!(head.tree().keys().collect::<Vec<_>>(), vec!["b.txt"]);
    assert!(repository.status().unwrap().staged_files.is_empty());
}

#[rstest]
#[case::empty("")]
#[case::blank("   \n")]
fn commit_requires_a_message(linear_history: TestRepository, #[case] message: &str) {
    linear_history.write("a.txt", "A2\n");
    linear_history.repository.add("a.txt").unwrap();

    assert!(matches!(
        linear_history.repository.commit(message),
        Err(GitletError::EmptyCommitMessage)
    ));
}

#[rstest]
fn commit_requires_staged_changes(linear_history: TestRepository) {
    assert!(matches!(
        linear_history.repository.commit("nothing"),
        Err(GitletError::NothingStaged)
    ));
}

#[rstest]
fn rm_of_an_unknown_file_fails(linear_history: TestRepository) {
    linear_history.write("stray.txt", "stray\n");

    assert!(matches!(
        linear_history.repository.rm("stray.txt"),
        Err(GitletError::NothingToRemove(path)) if path == "stray.txt"
    ));
    assert!(linear_history.exists("stray.txt"));
}

#[rstest]
fn rm_of_a_staged_file_only_unstages_it(linear_history: TestRepository) {
    let repository = &linear_history.repository;

    linear_history.write("new.txt", "new\n");
    repository.add("new.txt").unwrap();
    repository.rm("new.txt").unwrap();

    let status = repository.status().unwrap();
    assert!(linear_history.exists("new.txt"));
    assert!(status.staged_files.is_empty());
    assert!(status.removed_files.is_empty());
    assert!(status.untracked_files.contains("new.txt"));
}

#[rstest]
fn status_reports_unstaged_changes(linear_history: TestRepository) {
    use gitlet::artifacts::status::file_change::WorkspaceChangeType;

    let repository = &linear_history.repository;
    linear_history.commit_file("b.txt", "B1\n", "add b");

    linear_history.write("a.txt", "edited\n");
    std::fs::remove_file(linear_history.dir.path().join("b.txt")).unwrap();
    linear_history.write("c.txt", "C1\n");
    repository.add("c.txt").unwrap();
    linear_history.write("c.txt", "C2\n");
    linear_history.write("d.txt", "D1\n");

    let status = repository.status().unwrap();

    assert_eq!(
        status.unstaged_changes.into_iter().collect::<Vec<_>>(),
        vec![
            ("a.txt".to_string(), WorkspaceChangeType::Modified),
            ("b.txt".to_string(), WorkspaceChangeType::Deleted),
            ("c.txt".to_string(), WorkspaceChangeType::Modified),
        ]
    );
    assert_eq!(
        status.untracked_files.into_iter().collect::<Vec<_>>(),
        vec!["d.txt".to_string()]
    );
    assert_eq!(status.active_branch.unwrap().as_ref(), "master");
}
