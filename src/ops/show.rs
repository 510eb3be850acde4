use crate::diff::{tree_delta, DiffEntry};
use crate::error::Result;
use crate::object::{read_commit, read_tree};
use crate::repo::Repo;
use crate::resolver::resolve_to_commit;
use crate::types::{Commit, Tree};

/// a commit plus the delta it introduced against its first parent (or
/// against the empty tree, for a root commit).
pub fn show(repo: &Repo, rev: &str) -> Result<(Commit, Vec<DiffEntry>)> {
    let id = resolve_to_commit(repo, rev)?;
    let commit = read_commit(repo, &id)?;
    let tree = read_tree(repo, &commit.tree)?;

    let parent_tree = match commit.parents.first() {
        Some(parent_id) => {
            let parent = read_commit(repo, parent_id)?;
            read_tree(repo, &parent.tree)?
        }
        None => Tree::empty(),
    };

    let delta = tree_delta(&parent_tree, &tree);
    Ok((commit, delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;
    use crate::ops::add::add;
    use crate::ops::commit::commit;
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        let repo = Repo::init(&repo_path).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_show_root_commit_shows_all_added() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "first").unwrap();

        let (c, delta) = show(&repo, "HEAD").unwrap();
        assert_eq!(c.message, "first");
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].kind, ChangeKind::Added);
    }

    #[test]
    fn test_show_second_commit_shows_modification() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "v1").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "v1").unwrap();

        fs::write(repo.root().join("a.txt"), "v2").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "v2").unwrap();

        let (_, delta) = show(&repo, "HEAD").unwrap();
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].kind, ChangeKind::Modified);
    }
}
