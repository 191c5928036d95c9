use crate::common::repository::{TestRepository, linear_history, test_repository};
use gitlet::artifacts::branch::revision::Revision;
use gitlet::artifacts::objects::commit::{Commit, Tree};
use gitlet::artifacts::objects::object::Object;
use gitlet::artifacts::objects::object_id::ObjectId;
use gitlet::errors::GitletError;
use std::collections::HashMap;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn log_follows_first_parents_back_to_the_initial_commit(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let c2 = linear_history.commit_file("a.txt", "A2\n", "c2");

    let history = repository
        .log()
        .unwrap()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(
        history
            .iter()
            .map(|(_, commit)| commit.message())
            .collect::<Vec<_>>(),
        vec!["c2", "c1", "initial commit"]
    );
    assert_eq!(history[0].0, c2);
}

#[rstest]
fn head_tree_after_one_commit(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let (_, head) = repository.head_commit().unwrap();

    assert_eq!(repository.log().unwrap().into_iter().count(), 2);
    assert_eq!(head.tree().len(), 1);
    let blob_id = head.blob_for("a.txt").unwrap();
    assert_eq!(
        repository.database().load_blob_data(blob_id).unwrap().as_ref(),
        b"A1\n"
    );
}

#[rstest]
fn global_log_includes_commits_no_branch_reaches(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let c1 = linear_history.head();
    let c2 = linear_history.commit_file("a.txt", "A2\n", "c2");
    repository.reset(c1.as_ref()).unwrap();

    let all_commits = repository
        .global_log()
        .unwrap()
        .into_iter()
        .map(|(oid, _)| oid)
        .collect::<Vec<_>>();

    assert_eq!(all_commits.len(), 3);
    assert!(all_commits.contains(&c2));
}

#[rstest]
fn find_matches_whole_messages(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let c1 = linear_history.head();
    linear_history.commit_file("b.txt", "B1\n", "c1 follow-up");

    assert_eq!(repository.find("c1").unwrap(), vec![c1]);
    assert!(repository.find("c").unwrap().is_empty());
}

#[rstest]
fn identical_content_is_stored_once(test_repository: TestRepository) {
    let repository = &test_repository.repository;
    test_repository.write("one.txt", "same\n");
    test_repository.write("two.txt", "same\n");
    repository.add("one.txt").unwrap();
    repository.add("two.txt").unwrap();
    repository.commit("twins").unwrap();

    let (_, head) = repository.head_commit().unwrap();
    assert_eq!(head.blob_for("one.txt"), head.blob_for("two.txt"));
    // the initial commit, one blob, one commit
    assert_eq!(repository.database().list_objects().unwrap().len(), 3);
}

#[rstest]
fn blob_ids_do_not_resolve_as_commits(linear_history: TestRepository) {
    let repository = &linear_history.repository;
    let (_, head) = repository.head_commit().unwrap();
    let blob_id = head.blob_for("a.txt").unwrap();

    assert!(matches!(
        repository.reset(&blob_id.as_ref()[..10]),
        Err(GitletError::NoSuchCommit(_))
    ));
    assert!(matches!(
        repository.reset(blob_id.as_ref()),
        Err(GitletError::NoSuchCommit(_))
    ));
    assert!(matches!(
        repository.reset("HEAD~5"),
        Err(GitletError::NoSuchCommit(_))
    ));
}

#[rstest]
fn abbreviated_ids_shared_by_several_commits_are_ambiguous(test_repository: TestRepository) {
    let repository = &test_repository.repository;
    let (initial_id, initial) = repository.head_commit().unwrap();

    // Children of the initial commit until two ids share their first 4 digits
    let mut by_prefix: HashMap<String, (ObjectId, Commit)> = HashMap::new();
    let (prefix, first, second) = (0..)
        .find_map(|n| {
            let commit = Commit::new(
                format!("commit {n}"),
                initial.timestamp(),
                vec![initial_id.clone()],
                Tree::new(),
            );
            let oid = commit.object_id().unwrap();
            let prefix = oid.as_ref()[..4].to_string();
            if prefix == initial_id.as_ref()[..4] {
                return None;
            }

            by_prefix
                .insert(prefix.clone(), (oid.clone(), commit.clone()))
                .map(|earlier| (prefix, earlier, (oid, commit)))
        })
        .unwrap();
    repository.database().store(&first.1).unwrap();
    repository.database().store(&second.1).unwrap();

    let mut expected = vec![first.0.clone(), second.0.clone()];
    expected.sort();

    match Revision::try_parse(&prefix).unwrap().resolve(repository) {
        Err(GitletError::AmbiguousCommitId {
            prefix: reported,
            mut candidates,
        }) => {
            candidates.sort();
            assert_eq!(reported, prefix);
            assert_eq!(candidates, expected);
        }
        other => panic!("expected an ambiguous id error, got {other:?}"),
    }
    assert!(matches!(
        repository.reset(&prefix),
        Err(GitletError::AmbiguousCommitId { .. })
    ));
    assert_eq!(
        Revision::try_parse(first.0.as_ref())
            .unwrap()
            .resolve(repository)
            .unwrap(),
        first.0
    );
}
