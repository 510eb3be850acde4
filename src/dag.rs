use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::hash::Hash;
use crate::object::commit::read_commit;
use crate::repo::Repo;

/// walk first parents only, from `start` back to the root.
pub fn first_parent_history(repo: &Repo, start: Hash) -> Result<Vec<Hash>> {
    let mut history = Vec::new();
    let mut current = Some(start);
    while let Some(id) = current {
        let commit = read_commit(repo, &id)?;
        history.push(id);
        current = commit.parents.first().copied();
    }
    Ok(history)
}

/// the full set of commits reachable from `start`, following every
/// parent edge (a BFS closure over the commit DAG).
pub fn ancestor_set(repo: &Repo, start: Hash) -> Result<HashSet<Hash>> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        let commit = read_commit(repo, &id)?;
        for parent in commit.parents {
            if !seen.contains(&parent) {
                queue.push_back(parent);
            }
        }
    }

    Ok(seen)
}

/// find a lowest common ancestor of `a` and `b` by walking `b`'s history
/// breadth-first and returning the first node already in `a`'s ancestor
/// set. returns `None` if the two commits share no history.
pub fn lowest_common_ancestor(repo: &Repo, a: Hash, b: Hash) -> Result<Option<Hash>> {
    let ancestors_of_a = ancestor_set(repo, a)?;

    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(b);

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        if ancestors_of_a.contains(&id) {
            return Ok(Some(id));
        }
        let commit = read_commit(repo, &id)?;
        for parent in commit.parents {
            queue.push_back(parent);
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::commit::write_commit;
    use crate::types::Commit;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        let repo = Repo::init(&repo_path).unwrap();
        (dir, repo)
    }

    fn commit(repo: &Repo, parents: Vec<Hash>, msg: &str) -> Hash {
        write_commit(repo, &Commit::new(Hash::ZERO, parents, "jane", 0, msg)).unwrap()
    }

    #[test]
    fn test_first_parent_history_linear() {
        let (_dir, repo) = test_repo();
        let c1 = commit(&repo, vec![], "c1");
        let c2 = commit(&repo, vec![c1], "c2");
        let c3 = commit(&repo, vec![c2], "c3");

        let history = first_parent_history(&repo, c3).unwrap();
        assert_eq!(history, vec![c3, c2, c1]);
    }

    #[test]
    fn test_first_parent_history_follows_only_first_parent() {
        let (_dir, repo) = test_repo();
        let c1 = commit(&repo, vec![], "c1");
        let side = commit(&repo, vec![c1], "side");
        let main = commit(&repo, vec![c1], "main");
        let merge = commit(&repo, vec![main, side], "merge");

        let history = first_parent_history(&repo, merge).unwrap();
        assert_eq!(history, vec![merge, main, c1]);
    }

    #[test]
    fn test_ancestor_set_includes_all_branches() {
        let (_dir, repo) = test_repo();
        let c1 = commit(&repo, vec![], "c1");
        let side = commit(&repo, vec![c1], "side");
        let main = commit(&repo, vec![c1], "main");
        let merge = commit(&repo, vec![main, side], "merge");

        let ancestors = ancestor_set(&repo, merge).unwrap();
        assert!(ancestors.contains(&c1));
        assert!(ancestors.contains(&side));
        assert!(ancestors.contains(&main));
        assert!(ancestors.contains(&merge));
        assert_eq!(ancestors.len(), 4);
    }

    #[test]
    fn test_lowest_common_ancestor_of_diverged_branches() {
        let (_dir, repo) = test_repo();
        let base = commit(&repo, vec![], "base");
        let a = commit(&repo, vec![base], "a");
        let b = commit(&repo, vec![base], "b");

        assert_eq!(lowest_common_ancestor(&repo, a, b).unwrap(), Some(base));
    }

    #[test]
    fn test_lowest_common_ancestor_when_one_is_ancestor_of_other() {
        let (_dir, repo) = test_repo();
        let base = commit(&repo, vec![], "base");
        let child = commit(&repo, vec![base], "child");

        assert_eq!(lowest_common_ancestor(&repo, base, child).unwrap(), Some(base));
    }

    #[test]
    fn test_no_common_ancestor_across_unrelated_histories() {
        let (_dir, repo) = test_repo();
        let a = commit(&repo, vec![], "a");
        let b = commit(&repo, vec![], "b");

        assert_eq!(lowest_common_ancestor(&repo, a, b).unwrap(), None);
    }
}
