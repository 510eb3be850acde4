use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::{read_index, write_index};
use crate::object::{read_commit, read_tree, write_commit, write_tree};
use crate::refs;
use crate::repo::Repo;
use crate::scanner::scan_workdir;
use crate::types::Commit;

use super::checkout::materialize_tree;
use super::commit::current_identity;

/// a stash entry: a commit holding both a staged-state snapshot and a
/// working-tree snapshot. `commit.tree` is the index tree; the workdir
/// tree rides in the commit's second parent slot (`commit.parents[1]`),
/// alongside the real HEAD commit it was taken against
/// (`commit.parents[0]`). This keeps a stash a plain four-kind object
/// on disk while still carrying two independent snapshots.
#[derive(Debug, Clone)]
pub struct StashEntry {
    pub id: Hash,
    pub commit: Commit,
    pub index_tree: Hash,
    pub workdir_tree: Hash,
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// snapshot the index and the working tree as a stash commit, then
/// reset the working tree and index back to HEAD.
pub fn push(repo: &Repo, message: Option<&str>) -> Result<Hash> {
    let head_id = refs::head_commit(repo)?;
    let head_tree = read_tree(repo, &read_commit(repo, &head_id)?.tree)?;
    let index_tree = read_index(repo)?;
    let workdir_tree = scan_workdir(repo)?;

    if index_tree == head_tree && workdir_tree == head_tree {
        return Err(Error::Usage("no local changes to stash".to_string()));
    }

    let index_tree_id = write_tree(repo, &index_tree)?;
    let workdir_tree_id = write_tree(repo, &workdir_tree)?;
    let identity = current_identity(repo)?;
    let commit = Commit::new(
        index_tree_id,
        vec![head_id, workdir_tree_id],
        identity,
        now(),
        message.unwrap_or("WIP"),
    );
    let stash_id = write_commit(repo, &commit)?;

    refs::push_stash(repo, stash_id)?;

    materialize_tree(repo, &head_tree)?;
    write_index(repo, &head_tree)?;

    Ok(stash_id)
}

/// list stash entries, most recently pushed first.
pub fn list(repo: &Repo) -> Result<Vec<StashEntry>> {
    refs::read_stash(repo)?
        .into_iter()
        .map(|id| {
            let commit = read_commit(repo, &id)?;
            let workdir_tree = *commit.parents.get(1).ok_or_else(|| {
                Error::CorruptObject(id, "stash commit missing workdir-tree parent".to_string())
            })?;
            Ok(StashEntry {
                id,
                index_tree: commit.tree,
                workdir_tree,
                commit,
            })
        })
        .collect()
}

/// apply the most recent stash entry to the working tree and index, and
/// drop it.
pub fn pop(repo: &Repo) -> Result<Hash> {
    let id = refs::pop_stash_entry(repo)?
        .ok_or_else(|| Error::Usage("no stash entries".to_string()))?;
    apply_stash(repo, id)?;
    Ok(id)
}

/// apply the most recent stash entry without dropping it.
pub fn apply(repo: &Repo) -> Result<Hash> {
    let id = refs::peek_stash_entry(repo)?
        .ok_or_else(|| Error::Usage("no stash entries".to_string()))?;
    apply_stash(repo, id)?;
    Ok(id)
}

fn apply_stash(repo: &Repo, id: Hash) -> Result<()> {
    let commit = read_commit(repo, &id)?;
    let workdir_tree_id = commit.parents.get(1).ok_or_else(|| {
        Error::CorruptObject(id, "stash commit missing workdir-tree parent".to_string())
    })?;

    let index_tree = read_tree(repo, &commit.tree)?;
    let workdir_tree = read_tree(repo, workdir_tree_id)?;

    materialize_tree(repo, &workdir_tree)?;
    write_index(repo, &index_tree)
}
