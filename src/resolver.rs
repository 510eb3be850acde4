use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{Hash, ObjectKind};
use crate::object;
use crate::refs;
use crate::repo::Repo;

/// resolve a revision string to an object id.
///
/// lookup order: `HEAD`, a branch name, a tag name, a full 40-character
/// hex id, then a hex prefix scan (minimum 4 characters) over the object
/// store, erroring with `Ambiguous` if more than one object shares the
/// prefix.
pub fn resolve(repo: &Repo, rev: &str) -> Result<Hash> {
    if rev == "HEAD" {
        return refs::head_commit(repo);
    }
    if refs::branch_exists(repo, rev) {
        return refs::branch_commit(repo, rev);
    }
    if refs::tag_exists(repo, rev) {
        return refs::tag_object_id(repo, rev);
    }
    if rev.len() == 40 && rev.chars().all(|c| c.is_ascii_hexdigit()) {
        return Hash::from_hex(rev);
    }
    resolve_prefix(repo, rev)
}

/// resolve a revision string down to a commit, peeling through any
/// annotated tag object it points at.
pub fn resolve_to_commit(repo: &Repo, rev: &str) -> Result<Hash> {
    let id = resolve(repo, rev)?;
    peel_to_commit(repo, id)
}

fn peel_to_commit(repo: &Repo, id: Hash) -> Result<Hash> {
    let (kind, body) = object::read_object(repo, &id)?;
    match kind {
        ObjectKind::Commit => Ok(id),
        ObjectKind::Tag => {
            let tag = object::tag::decode_tag(&id, &body)?;
            peel_to_commit(repo, tag.object)
        }
        other => Err(Error::BadRevision(format!("{} is a {}, not a commit", id, other))),
    }
}

fn resolve_prefix(repo: &Repo, prefix: &str) -> Result<Hash> {
    if prefix.len() < 4 || prefix.len() > 40 || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::BadRevision(prefix.to_string()));
    }

    let objects_dir = repo.objects_path();
    let mut matches = Vec::new();

    if objects_dir.exists() {
        for entry in fs::read_dir(&objects_dir).with_path(&objects_dir)? {
            let entry = entry.with_path(&objects_dir)?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            if name.starts_with(prefix) {
                matches.push(name);
            }
        }
    }

    match matches.len() {
        0 => Err(Error::BadRevision(prefix.to_string())),
        1 => Hash::from_hex(&matches[0]),
        _ => Err(Error::Ambiguous(prefix.to_string())),
    }
}
