use std::fs;

use walkdir::WalkDir;

use crate::error::{IoResultExt, Result};
use crate::hash::{compute_object_id, Hash, ObjectKind};
use crate::ignore::IgnoreSet;
use crate::repo::{Repo, META_DIR};
use crate::types::Tree;

/// scan the working tree into a flat path→content-hash mapping with the
/// same shape as a committed tree. content ids are
/// computed the same way blob ids are, so a scanned path's hash equals
/// what `add` would produce for it — this is what makes the three-tree
/// comparison in `status` meaningful. the scan never writes to the
/// object store; that only happens when a path is actually staged.
pub fn scan_workdir(repo: &Repo) -> Result<Tree> {
    let ignore = IgnoreSet::load(repo)?;
    let mut tree = Tree::empty();

    let walker = WalkDir::new(repo.root())
        .into_iter()
        .filter_entry(|entry| entry.file_name().to_str() != Some(META_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| crate::error::Error::Io {
            path: repo.root().to_path_buf(),
            source: std::io::Error::other(e),
        })?;

        if entry.file_type().is_dir() {
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(repo.root())
            .unwrap_or(entry.path());
        let rel_str = rel.to_string_lossy().replace('\\', "/");

        if ignore.is_ignored(&rel_str, false) {
            continue;
        }

        let content = fs::read(entry.path()).with_path(entry.path())?;
        let (id, _) = compute_object_id(ObjectKind::Blob, &content);
        tree.insert(rel_str, id);
    }

    Ok(tree)
}

/// compute what a single working-tree file's blob id would be, without
/// writing it to the object store.
pub fn content_hash(content: &[u8]) -> Hash {
    compute_object_id(ObjectKind::Blob, content).0
}
