//! end-to-end scenarios exercising several modules together, the way a
//! CLI session would.

use std::fs;

use pygit::ops::{self, CheckoutOptions, MergeOutcome};
use pygit::Repo;
use tempfile::tempdir;

fn new_repo() -> (tempfile::TempDir, Repo) {
    let dir = tempdir().unwrap();
    let repo_path = dir.path().join("repo");
    let repo = Repo::init(&repo_path).unwrap();
    (dir, repo)
}

#[test]
fn s1_init_and_first_commit() {
    let (_dir, repo) = new_repo();

    fs::write(repo.root().join("a.txt"), "hello").unwrap();
    ops::add(&repo, &["a.txt".to_string()]).unwrap();
    let id = ops::commit(&repo, "one").unwrap();

    let history = ops::log(&repo, "HEAD", None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].commit.message, "one");
    assert_eq!(history[0].hash, id);

    assert_eq!(pygit::branch_commit(&repo, "main").unwrap(), id);
}

#[test]
fn s2_stage_unstage_detection() {
    let (_dir, repo) = new_repo();

    fs::write(repo.root().join("a.txt"), "hello").unwrap();
    ops::add(&repo, &["a.txt".to_string()]).unwrap();
    ops::commit(&repo, "one").unwrap();

    fs::write(repo.root().join("a.txt"), "hello!").unwrap();
    let status = ops::status(&repo).unwrap();
    assert!(status.staged.is_empty());
    assert_eq!(status.unstaged.len(), 1);
    assert_eq!(status.unstaged[0].path, "a.txt");

    ops::add(&repo, &["a.txt".to_string()]).unwrap();
    let status = ops::status(&repo).unwrap();
    assert!(status.unstaged.is_empty());
    assert_eq!(status.staged.len(), 1);
    assert_eq!(status.staged[0].path, "a.txt");
}

#[test]
fn s3_branch_isolation() {
    let (_dir, repo) = new_repo();

    fs::write(repo.root().join("a.txt"), "hello").unwrap();
    ops::add(&repo, &["a.txt".to_string()]).unwrap();
    ops::commit(&repo, "one").unwrap();

    ops::checkout(
        &repo,
        "feature",
        CheckoutOptions {
            create_branch: true,
            force: false,
        },
    )
    .unwrap();
    fs::write(repo.root().join("b.txt"), "x").unwrap();
    ops::add(&repo, &["b.txt".to_string()]).unwrap();
    ops::commit(&repo, "two").unwrap();

    ops::checkout(&repo, "main", CheckoutOptions::default()).unwrap();
    assert!(!repo.root().join("b.txt").exists());
}

#[test]
fn s4_fast_forward_merge() {
    let (_dir, repo) = new_repo();

    fs::write(repo.root().join("a.txt"), "hello").unwrap();
    ops::add(&repo, &["a.txt".to_string()]).unwrap();
    ops::commit(&repo, "one").unwrap();

    ops::checkout(
        &repo,
        "feature",
        CheckoutOptions {
            create_branch: true,
            force: false,
        },
    )
    .unwrap();
    fs::write(repo.root().join("b.txt"), "x").unwrap();
    ops::add(&repo, &["b.txt".to_string()]).unwrap();
    let feature_tip = ops::commit(&repo, "two").unwrap();

    ops::checkout(&repo, "main", CheckoutOptions::default()).unwrap();
    let outcome = ops::merge(&repo, "feature").unwrap();

    assert_eq!(outcome, MergeOutcome::FastForward(feature_tip));
    assert!(repo.root().join("b.txt").exists());
    assert_eq!(pygit::branch_commit(&repo, "main").unwrap(), feature_tip);
}

#[test]
fn s5_three_way_merge_with_conflict() {
    let (_dir, repo) = new_repo();

    fs::write(repo.root().join("c.txt"), "base").unwrap();
    ops::add(&repo, &["c.txt".to_string()]).unwrap();
    let base = ops::commit(&repo, "base").unwrap();

    ops::checkout(
        &repo,
        "branch1",
        CheckoutOptions {
            create_branch: true,
            force: false,
        },
    )
    .unwrap();
    fs::write(repo.root().join("c.txt"), "B1").unwrap();
    ops::add(&repo, &["c.txt".to_string()]).unwrap();
    ops::commit(&repo, "branch1 change").unwrap();

    pygit::write_branch(&repo, "branch2", &base).unwrap();
    ops::checkout(&repo, "branch2", CheckoutOptions::default()).unwrap();
    fs::write(repo.root().join("c.txt"), "B2").unwrap();
    ops::add(&repo, &["c.txt".to_string()]).unwrap();
    ops::commit(&repo, "branch2 change").unwrap();

    ops::checkout(&repo, "branch1", CheckoutOptions::default()).unwrap();
    let before = pygit::branch_commit(&repo, "branch1").unwrap();

    let outcome = ops::merge(&repo, "branch2").unwrap();
    assert!(matches!(outcome, MergeOutcome::Conflicts(_)));

    let content = fs::read_to_string(repo.root().join("c.txt")).unwrap();
    assert!(content.contains("<<<<<<< HEAD"));
    assert!(content.contains("======="));
    assert!(content.contains(">>>>>>> branch2"));

    assert_eq!(pygit::branch_commit(&repo, "branch1").unwrap(), before);
}

#[test]
fn s6_stash_round_trip() {
    let (_dir, repo) = new_repo();

    fs::write(repo.root().join("a.txt"), "x").unwrap();
    ops::add(&repo, &["a.txt".to_string()]).unwrap();
    ops::commit(&repo, "baseline").unwrap();

    fs::write(repo.root().join("a.txt"), "y").unwrap();
    ops::stash_push(&repo, None).unwrap();
    assert_eq!(fs::read_to_string(repo.root().join("a.txt")).unwrap(), "x");

    ops::stash_pop(&repo).unwrap();
    assert_eq!(fs::read_to_string(repo.root().join("a.txt")).unwrap(), "y");
}
