use std::fs;

use crate::error::{IoResultExt, Result};
use crate::index::{read_index, write_index};
use crate::object::write_blob;
use crate::repo::Repo;
use crate::scanner::scan_workdir;
use crate::types::Tree;

/// stage paths into the index. `"."` stages the whole working tree
/// (minus ignored paths).
pub fn add(repo: &Repo, paths: &[String]) -> Result<()> {
    let mut index = read_index(repo)?;

    if paths.iter().any(|p| p == ".") {
        let workdir = scan_workdir(repo)?;
        for path in workdir.paths() {
            stage_path(repo, &mut index, path)?;
        }
    } else {
        for path in paths {
            stage_path(repo, &mut index, path)?;
        }
    }

    write_index(repo, &index)
}

fn stage_path(repo: &Repo, index: &mut Tree, path: &str) -> Result<()> {
    let full = repo.root().join(path);
    let content = fs::read(&full).with_path(&full)?;
    let blob_id = write_blob(repo, &content)?;
    index.insert(path.to_string(), blob_id);
    Ok(())
}
