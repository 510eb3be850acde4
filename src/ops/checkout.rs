use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::index::write_index;
use crate::object::{read_blob, read_commit, read_tree};
use crate::refs::{self, Head};
use crate::repo::Repo;
use crate::resolver;
use crate::scanner::scan_workdir;
use crate::types::Tree;

use super::status::status;

#[derive(Clone, Copy, Default)]
pub struct CheckoutOptions {
    /// create `target` as a new branch at the current HEAD before switching
    pub create_branch: bool,
    /// switch even if the working tree has uncommitted changes
    pub force: bool,
}

/// switch the working tree, index, and HEAD to `target` (a branch name
/// or any revision). refuses to discard uncommitted changes unless
/// `force` is set.
pub fn checkout(repo: &Repo, target: &str, opts: CheckoutOptions) -> Result<()> {
    if opts.create_branch {
        let current = refs::head_commit(repo)?;
        refs::write_branch(repo, target, &current)?;
    }

    if !opts.force {
        let current_status = status(repo)?;
        if !current_status.staged.is_empty() || !current_status.unstaged.is_empty() {
            return Err(Error::Usage(
                "uncommitted changes would be overwritten by checkout".to_string(),
            ));
        }
    }

    let commit_id = if refs::branch_exists(repo, target) {
        refs::branch_commit(repo, target)?
    } else {
        resolver::resolve_to_commit(repo, target)?
    };

    let commit = read_commit(repo, &commit_id)?;
    let tree = read_tree(repo, &commit.tree)?;

    materialize_tree(repo, &tree)?;
    write_index(repo, &tree)?;

    if refs::branch_exists(repo, target) {
        refs::write_head_branch(repo, target)?;
    } else {
        refs::write_head_detached(repo, &commit_id)?;
    }

    Ok(())
}

/// restore specific paths from a revision into the working tree and
/// index, leaving HEAD untouched.
pub fn restore(repo: &Repo, rev: &str, paths: &[String]) -> Result<()> {
    let commit_id = resolver::resolve_to_commit(repo, rev)?;
    let commit = read_commit(repo, &commit_id)?;
    let tree = read_tree(repo, &commit.tree)?;

    let mut index = crate::index::read_index(repo)?;

    for path in paths {
        let blob_id = tree
            .get(path)
            .ok_or_else(|| Error::PathNotFound(path.clone()))?;
        let content = read_blob(repo, blob_id)?;

        let full = repo.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&full, &content).with_path(&full)?;

        index.insert(path.clone(), *blob_id);
    }

    write_index(repo, &index)
}

/// write `tree`'s blobs into the working directory and delete any
/// tracked file the current working tree has that `tree` doesn't.
pub(crate) fn materialize_tree(repo: &Repo, tree: &Tree) -> Result<()> {
    let current = scan_workdir(repo)?;

    for path in current.paths() {
        if tree.get(path).is_none() {
            let full = repo.root().join(path);
            if full.exists() {
                fs::remove_file(&full).with_path(&full)?;
            }
        }
    }

    for (path, blob_id) in tree.iter() {
        let content = read_blob(repo, blob_id)?;
        let full = repo.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&full, &content).with_path(&full)?;
    }

    Ok(())
}
