use std::fs;

use crate::error::{IoResultExt, Result};
use crate::index::read_index;
use crate::repo::Repo;
use crate::scanner::scan_workdir;

/// remove untracked files from the working tree. with `dry_run`, returns
/// what would be removed without touching the filesystem.
pub fn clean(repo: &Repo, dry_run: bool) -> Result<Vec<String>> {
    let index = read_index(repo)?;
    let workdir = scan_workdir(repo)?;

    let mut removed = Vec::new();
    for path in workdir.paths() {
        if !index.contains(path) {
            removed.push(path.clone());
            if !dry_run {
                let full = repo.root().join(path);
                fs::remove_file(&full).with_path(&full)?;
            }
        }
    }

    removed.sort();
    Ok(removed)
}
