use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::repo::Repo;
use crate::types::Tree;

/// the index (staging area) has the exact same shape as a tree: a flat
/// path→blob mapping. it is persisted separately from any
/// committed tree object so that `add`/`rm` can mutate it in place.
pub fn read_index(repo: &Repo) -> Result<Tree> {
    let path = repo.index_path();
    let content = fs::read_to_string(&path).with_path(&path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::CorruptObject(crate::Hash::ZERO, format!("malformed index: {}", e)))
}

pub fn write_index(repo: &Repo, index: &Tree) -> Result<()> {
    let path = repo.index_path();
    let content = serde_json::to_string_pretty(index)?;
    fs::write(&path, content).with_path(&path)
}

/// stage a path at the given blob id, replacing any existing entry
pub fn stage(repo: &Repo, path: &str, blob: crate::Hash) -> Result<()> {
    let mut index = read_index(repo)?;
    index.insert(path, blob);
    write_index(repo, &index)
}

/// unstage a path, returning an error if it wasn't staged
pub fn unstage(repo: &Repo, path: &str) -> Result<()> {
    let mut index = read_index(repo)?;
    index
        .remove(path)
        .ok_or_else(|| Error::PathNotFound(path.to_string()))?;
    write_index(repo, &index)
}
