use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::index::{read_index, write_index};
use crate::repo::Repo;

/// remove paths from the index. with `cached`, the working-tree copy is
/// left in place (the `--cached` variant of the operation).
pub fn rm(repo: &Repo, paths: &[String], cached: bool) -> Result<()> {
    let mut index = read_index(repo)?;

    for path in paths {
        index
            .remove(path)
            .ok_or_else(|| Error::PathNotFound(path.clone()))?;

        if !cached {
            let full = repo.root().join(path);
            if full.exists() {
                fs::remove_file(&full).with_path(&full)?;
            }
        }
    }

    write_index(repo, &index)
}
