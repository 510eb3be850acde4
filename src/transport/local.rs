//! local file transport: cloning a repository by copying its object
//! store and refs onto a fresh working directory.

use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::refs::{self, Head};
use crate::repo::Repo;

/// clone `src` into a freshly initialized repository at `dst_path`,
/// copying every object and ref, then checking out HEAD.
pub fn clone_local(src: &Repo, dst_path: &Path) -> Result<Repo> {
    let dst = Repo::init(dst_path)?;

    let stats = copy_objects(src, &dst)?;
    log::debug!(
        "clone: copied {} objects ({} hardlinked, {} skipped)",
        stats.copied + stats.hardlinked,
        stats.hardlinked,
        stats.skipped
    );
    copy_refs(src, &dst)?;

    match refs::read_head(src)? {
        Head::Attached(branch) if refs::branch_exists(&dst, &branch) => {
            refs::write_head_branch(&dst, &branch)?
        }
        Head::Attached(_) => {}
        Head::Detached(id) => refs::write_head_detached(&dst, &id)?,
    }

    if let Ok(commit_id) = refs::head_commit(&dst) {
        let commit = crate::object::read_commit(&dst, &commit_id)?;
        let tree = crate::object::read_tree(&dst, &commit.tree)?;
        crate::ops::materialize_tree(&dst, &tree)?;
        crate::index::write_index(&dst, &tree)?;
    }

    Ok(dst)
}

/// copy every object file from `src`'s store into `dst`'s, hardlinking
/// where possible and falling back to a byte copy across filesystems.
fn copy_objects(src: &Repo, dst: &Repo) -> Result<TransferStats> {
    let mut stats = TransferStats::default();

    let objects_dir = src.objects_path();
    if !objects_dir.exists() {
        return Ok(stats);
    }

    fs::create_dir_all(dst.objects_path()).with_path(&dst.objects_path())?;

    for entry in fs::read_dir(&objects_dir).with_path(&objects_dir)? {
        let entry = entry.with_path(&objects_dir)?;
        if !entry.file_type().with_path(&objects_dir)?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let dst_path = dst.objects_path().join(&name);

        if dst_path.exists() {
            stats.skipped += 1;
            continue;
        }

        if fs::hard_link(entry.path(), &dst_path).is_ok() {
            stats.hardlinked += 1;
        } else {
            let content = fs::read(entry.path()).with_path(entry.path())?;
            stats.bytes_transferred += content.len() as u64;
            fs::write(&dst_path, &content).with_path(&dst_path)?;
            stats.copied += 1;
        }
    }

    Ok(stats)
}

/// copy every branch, tag and stash entry from `src` into `dst`.
fn copy_refs(src: &Repo, dst: &Repo) -> Result<()> {
    for name in refs::list_branches(src)? {
        let id = refs::branch_commit(src, &name)?;
        refs::write_branch(dst, &name, &id)?;
    }

    for name in refs::list_tags(src)? {
        let id = refs::tag_object_id(src, &name)?;
        let path = refs::tag_path(dst, &name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&path, format!("{}\n", id)).with_path(&path)?;
    }

    let stash = refs::read_stash(src)?;
    if !stash.is_empty() {
        refs::write_stash(dst, &stash)?;
    }

    Ok(())
}

/// counters describing an object-copy pass, surfaced to the caller for
/// logging.
#[derive(Debug, Default, Clone)]
pub struct TransferStats {
    pub copied: usize,
    pub hardlinked: usize,
    pub skipped: usize,
    pub bytes_transferred: u64,
}
