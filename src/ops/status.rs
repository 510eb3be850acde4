use crate::diff::{tree_delta, ChangeKind, DiffEntry};
use crate::error::{Error, Result};
use crate::index::read_index;
use crate::object::{read_commit, read_tree};
use crate::refs;
use crate::repo::Repo;
use crate::scanner::scan_workdir;
use crate::types::Tree;

/// working-tree status: the three-way comparison between HEAD's tree,
/// the index, and the working tree.
#[derive(Debug, Clone, Default)]
pub struct Status {
    /// changes between HEAD and the index (what the next commit includes)
    pub staged: Vec<DiffEntry>,
    /// changes between the index and the working tree, for paths the
    /// index already tracks
    pub unstaged: Vec<DiffEntry>,
    /// paths present in the working tree but never staged
    pub untracked: Vec<String>,
}

impl Status {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

pub fn status(repo: &Repo) -> Result<Status> {
    let index = read_index(repo)?;
    let workdir = scan_workdir(repo)?;

    let head_tree = match refs::head_commit(repo) {
        Ok(id) => read_tree(repo, &read_commit(repo, &id)?.tree)?,
        Err(Error::RefNotFound(_)) => Tree::empty(),
        Err(e) => return Err(e),
    };

    let staged = tree_delta(&head_tree, &index);

    let mut unstaged = Vec::new();
    let mut untracked = Vec::new();
    for entry in tree_delta(&index, &workdir) {
        match entry.kind {
            ChangeKind::Added => untracked.push(entry.path),
            _ => unstaged.push(entry),
        }
    }

    Ok(Status {
        staged,
        unstaged,
        untracked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_status_clean_repo() {
        let (_dir, repo) = test_repo();
        let status = status(&repo).unwrap();
        assert!(status.is_clean());
    }

    #[test]
    fn test_status_untracked_file() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();

        let status = status(&repo).unwrap();
        assert_eq!(status.untracked, vec!["a.txt".to_string()]);
        assert!(status.staged.is_empty());
        assert!(status.unstaged.is_empty());
    }

    #[test]
    fn test_status_staged_file() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();

        let status = status(&repo).unwrap();
        assert_eq!(status.staged.len(), 1);
        assert_eq!(status.staged[0].kind, ChangeKind::Added);
        assert!(status.untracked.is_empty());
    }

    #[test]
    fn test_status_modified_after_commit() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "v1").unwrap();
        add(&repo, &["a.txt".to_string()]).unwrap();
        commit(&repo, "first").unwrap();

        fs::write(repo.root().join("a.txt"), "v2").unwrap();

        let status = status(&repo).unwrap();
        assert!(status.staged.is_empty());
        assert_eq!(status.unstaged.len(), 1);
        assert_eq!(status.unstaged[0].kind, ChangeKind::Modified);
    }
}
