use std::collections::BTreeSet;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dag::lowest_common_ancestor;
use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::index::write_index;
use crate::object::{read_blob, read_commit, read_tree, write_blob, write_commit, write_tree};
use crate::refs::{self, Head};
use crate::repo::Repo;
use crate::types::{Commit, Tree};

use super::checkout::materialize_tree;
use super::commit::current_identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// HEAD already contains `branch`
    UpToDate,
    /// HEAD moved forward to `branch`'s tip without a new commit
    FastForward(Hash),
    /// a merge commit was created
    Merged(Hash),
    /// these paths conflict and were left with conflict markers
    Conflicts(Vec<String>),
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// merge `branch` into the current HEAD.
///
/// computes the lowest common ancestor of HEAD and `branch`, takes the
/// fast-forward path when possible, otherwise does a per-path three-way
/// merge: a path changed on only one side wins outright, a path changed
/// identically on both sides is kept, and anything else conflicts.
pub fn merge(repo: &Repo, branch: &str) -> Result<MergeOutcome> {
    let ours = refs::head_commit(repo)?;
    let theirs = refs::branch_commit(repo, branch)?;

    if ours == theirs {
        return Ok(MergeOutcome::UpToDate);
    }

    let base = lowest_common_ancestor(repo, ours, theirs)?
        .ok_or(Error::NoCommonAncestor(ours, theirs))?;

    if base == theirs {
        return Ok(MergeOutcome::UpToDate);
    }

    if base == ours {
        fast_forward_to(repo, theirs)?;
        return Ok(MergeOutcome::FastForward(theirs));
    }

    let base_tree = read_tree(repo, &read_commit(repo, &base)?.tree)?;
    let ours_tree = read_tree(repo, &read_commit(repo, &ours)?.tree)?;
    let theirs_tree = read_tree(repo, &read_commit(repo, &theirs)?.tree)?;

    let (mut merged_tree, conflicts) = merge_trees(&base_tree, &ours_tree, &theirs_tree);

    if !conflicts.is_empty() {
        write_conflict_markers(
            repo,
            &ours_tree,
            &theirs_tree,
            branch,
            &conflicts,
            &mut merged_tree,
        )?;
        write_index(repo, &merged_tree)?;
        return Ok(MergeOutcome::Conflicts(conflicts));
    }

    materialize_tree(repo, &merged_tree)?;
    write_index(repo, &merged_tree)?;

    let tree_id = write_tree(repo, &merged_tree)?;
    let identity = current_identity(repo)?;
    let message = format!("Merge branch '{}'", branch);
    let commit = Commit::new(tree_id, vec![ours, theirs], identity, now(), message);
    let commit_id = write_commit(repo, &commit)?;

    match refs::read_head(repo)? {
        Head::Attached(current_branch) => refs::write_branch(repo, &current_branch, &commit_id)?,
        Head::Detached(_) => refs::write_head_detached(repo, &commit_id)?,
    }

    Ok(MergeOutcome::Merged(commit_id))
}

fn merge_trees(base: &Tree, ours: &Tree, theirs: &Tree) -> (Tree, Vec<String>) {
    let mut result = Tree::empty();
    let mut conflicts = Vec::new();

    let all_paths: BTreeSet<&String> = base
        .paths()
        .chain(ours.paths())
        .chain(theirs.paths())
        .collect();

    for path in all_paths {
        let b = base.get(path);
        let o = ours.get(path);
        let t = theirs.get(path);

        if o == t {
            if let Some(hash) = o {
                result.insert(path.clone(), *hash);
            }
            continue;
        }

        if o == b {
            if let Some(hash) = t {
                result.insert(path.clone(), *hash);
            }
            continue;
        }

        if t == b {
            if let Some(hash) = o {
                result.insert(path.clone(), *hash);
            }
            continue;
        }

        conflicts.push(path.clone());
    }

    conflicts.sort();
    (result, conflicts)
}

/// write a conflict-marker file for each conflicted path and hash that
/// content into a blob, inserting it into `merged_tree` so the index
/// ends up holding the partially-merged tree rather than stale HEAD
/// state.
fn write_conflict_markers(
    repo: &Repo,
    ours: &Tree,
    theirs: &Tree,
    branch: &str,
    conflicts: &[String],
    merged_tree: &mut Tree,
) -> Result<()> {
    for path in conflicts {
        let ours_content = match ours.get(path) {
            Some(hash) => String::from_utf8_lossy(&read_blob(repo, hash)?).into_owned(),
            None => String::new(),
        };
        let theirs_content = match theirs.get(path) {
            Some(hash) => String::from_utf8_lossy(&read_blob(repo, hash)?).into_owned(),
            None => String::new(),
        };

        let merged = format!(
            "<<<<<<< HEAD\n{}=======\n{}>>>>>>> {}\n",
            ensure_trailing_newline(&ours_content),
            ensure_trailing_newline(&theirs_content),
            branch
        );

        let full = repo.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&full, &merged).with_path(&full)?;

        let blob_id = write_blob(repo, merged.as_bytes())?;
        merged_tree.insert(path.clone(), blob_id);
    }

    Ok(())
}

fn ensure_trailing_newline(s: &str) -> String {
    if s.is_empty() || s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{}\n", s)
    }
}

fn fast_forward_to(repo: &Repo, target: Hash) -> Result<()> {
    let commit = read_commit(repo, &target)?;
    let tree = read_tree(repo, &commit.tree)?;

    materialize_tree(repo, &tree)?;
    write_index(repo, &tree)?;

    match refs::read_head(repo)? {
        Head::Attached(branch) => refs::write_branch(repo, &branch, &target)?,
        Head::Detached(_) => refs::write_head_detached(repo, &target)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::add::add;
    use crate::ops::checkout::{checkout, CheckoutOptions};
    use crate::ops::commit::commit;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        let repo = Repo::init(&repo_path).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_merge_fast_forward() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "v1").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "base").unwrap();

        checkout(
            &repo,
            "feature",
            CheckoutOptions {
                create_branch: true,
                force: false,
            },
        )
        .unwrap();
        fs::write(repo.root().join("a.txt"), "v2").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "on feature").unwrap();

        checkout(&repo, "main", CheckoutOptions::default()).unwrap();
        let outcome = merge(&repo, "feature").unwrap();

        assert!(matches!(outcome, MergeOutcome::FastForward(_)));
        assert_eq!(
            fs::read_to_string(repo.root().join("a.txt")).unwrap(),
            "v2"
        );
    }

    #[test]
    fn test_merge_up_to_date() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "v1").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "base").unwrap();
        refs::write_branch(&repo, "feature", &refs::head_commit(&repo).unwrap()).unwrap();

        assert_eq!(merge(&repo, "feature").unwrap(), MergeOutcome::UpToDate);
    }

    #[test]
    fn test_merge_clean_three_way() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "base").unwrap();
        fs::write(repo.root().join("b.txt"), "base").unwrap();
        add(&repo, &[".".to_string()]).unwrap();
        commit(&repo, "base").unwrap();

        checkout(
            &repo,
            "feature",
            CheckoutOptions {
                create_branch: true,
                force: false,
            },
        )
        .unwrap();
        fs::write(repo.root().join("b.txt"), "changed on feature").unwrap();
        add(&repo, &["b.txt".to_string()]).unwrap();
        commit(&repo, "feature change").unwrap();

        checkout(&repo, "main", CheckoutOptions::default()).unwrap();
        fs::write(repo.root().join("a.txt"), "changed on main").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "main change").unwrap();

        let outcome = merge(&repo, "feature").unwrap();
        assert!(matches!(outcome, MergeOutcome::Merged(_)));
        assert_eq!(
            fs::read_to_string(repo.root().join("a.txt")).unwrap(),
            "changed on main"
        );
        assert_eq!(
            fs::read_to_string(repo.root().join("b.txt")).unwrap(),
            "changed on feature"
        );
    }

    #[test]
    fn test_merge_conflict_writes_markers() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "base").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "base").unwrap();

        checkout(
            &repo,
            "feature",
            CheckoutOptions {
                create_branch: true,
                force: false,
            },
        )
        .unwrap();
        fs::write(repo.root().join("a.txt"), "feature version").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "feature change").unwrap();

        checkout(&repo, "main", CheckoutOptions::default()).unwrap();
        fs::write(repo.root().join("a.txt"), "main version").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "main change").unwrap();

        let outcome = merge(&repo, "feature").unwrap();
        assert_eq!(outcome, MergeOutcome::Conflicts(vec!["a.txt".to_string()]));

        let content = fs::read_to_string(repo.root().join("a.txt")).unwrap();
        assert!(content.contains("<<<<<<< HEAD"));
        assert!(content.contains("main version"));
        assert!(content.contains("======="));
        assert!(content.contains("feature version"));
        assert!(content.contains(">>>>>>> feature"));

        let index = crate::index::read_index(&repo).unwrap();
        let blob_id = index.get("a.txt").expect("conflicted path staged in index");
        let blob = read_blob(&repo, blob_id).unwrap();
        assert_eq!(blob, content.as_bytes());
    }
}
