use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{Hash, ObjectKind};
use crate::object;
use crate::repo::Repo;
use crate::types::Tag;

/// the state HEAD is in: bound to a branch, or pointing at a commit
/// directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    Attached(String),
    Detached(Hash),
}

pub fn read_head(repo: &Repo) -> Result<Head> {
    let path = repo.head_path();
    let content = fs::read_to_string(&path).with_path(&path)?;
    let content = content.trim();

    if let Some(target) = content.strip_prefix("ref: ") {
        let name = target
            .strip_prefix("refs/heads/")
            .ok_or_else(|| Error::InvalidRef(target.to_string()))?;
        Ok(Head::Attached(name.to_string()))
    } else {
        Ok(Head::Detached(Hash::from_hex(content)?))
    }
}

pub fn write_head_branch(repo: &Repo, branch: &str) -> Result<()> {
    validate_ref_component(branch)?;
    atomic_write(&repo.head_path(), format!("ref: refs/heads/{}\n", branch).as_bytes())
}

pub fn write_head_detached(repo: &Repo, id: &Hash) -> Result<()> {
    atomic_write(&repo.head_path(), format!("{}\n", id).as_bytes())
}

/// resolve HEAD all the way down to a commit id, following the attached
/// branch if there is one.
pub fn head_commit(repo: &Repo) -> Result<Hash> {
    match read_head(repo)? {
        Head::Attached(branch) => branch_commit(repo, &branch),
        Head::Detached(id) => Ok(id),
    }
}

pub fn branch_path(repo: &Repo, name: &str) -> PathBuf {
    repo.refs_heads_path().join(name)
}

pub fn branch_commit(repo: &Repo, name: &str) -> Result<Hash> {
    read_ref_file(&branch_path(repo, name), || {
        Error::RefNotFound(format!("refs/heads/{}", name))
    })
}

pub fn write_branch(repo: &Repo, name: &str, id: &Hash) -> Result<()> {
    validate_ref_component(name)?;
    let path = branch_path(repo, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    atomic_write(&path, format!("{}\n", id).as_bytes())
}

pub fn delete_branch(repo: &Repo, name: &str) -> Result<()> {
    let path = branch_path(repo, name);
    fs::remove_file(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::RefNotFound(format!("refs/heads/{}", name))
        } else {
            Error::Io { path, source: e }
        }
    })
}

pub fn branch_exists(repo: &Repo, name: &str) -> bool {
    branch_path(repo, name).exists()
}

pub fn list_branches(repo: &Repo) -> Result<Vec<String>> {
    list_leaf_names(&repo.refs_heads_path())
}

pub fn tag_path(repo: &Repo, name: &str) -> PathBuf {
    repo.refs_tags_path().join(name)
}

/// create an annotated tag object pointing at `target` and record it
/// under `refs/tags/<name>`.
pub fn create_tag(
    repo: &Repo,
    name: &str,
    target: Hash,
    target_kind: ObjectKind,
    tagger: &str,
    tag_time: i64,
    message: &str,
) -> Result<Hash> {
    validate_ref_component(name)?;
    if tag_exists(repo, name) {
        return Err(Error::AlreadyExists(format!("refs/tags/{}", name)));
    }

    let tag = Tag::new(target, target_kind, name, tagger, tag_time, message);
    let tag_id = object::tag::write_tag(repo, &tag)?;

    let path = tag_path(repo, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    atomic_write(&path, format!("{}\n", tag_id).as_bytes())?;

    Ok(tag_id)
}

pub fn tag_object_id(repo: &Repo, name: &str) -> Result<Hash> {
    read_ref_file(&tag_path(repo, name), || {
        Error::RefNotFound(format!("refs/tags/{}", name))
    })
}

pub fn delete_tag(repo: &Repo, name: &str) -> Result<()> {
    let path = tag_path(repo, name);
    fs::remove_file(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::RefNotFound(format!("refs/tags/{}", name))
        } else {
            Error::Io { path, source: e }
        }
    })
}

pub fn tag_exists(repo: &Repo, name: &str) -> bool {
    tag_path(repo, name).exists()
}

pub fn list_tags(repo: &Repo) -> Result<Vec<String>> {
    list_leaf_names(&repo.refs_tags_path())
}

/// the stash is a LIFO list of commit ids (index 0 = most recently
/// pushed, "stash@{0}") persisted as one hex id per line.
pub fn read_stash(repo: &Repo) -> Result<Vec<Hash>> {
    let path = repo.stash_path();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).with_path(&path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(Hash::from_hex)
        .collect()
}

pub fn write_stash(repo: &Repo, entries: &[Hash]) -> Result<()> {
    let body: String = entries.iter().map(|h| format!("{}\n", h)).collect();
    atomic_write(&repo.stash_path(), body.as_bytes())
}

pub fn push_stash(repo: &Repo, id: Hash) -> Result<()> {
    let mut entries = read_stash(repo)?;
    entries.insert(0, id);
    write_stash(repo, &entries)
}

/// remove and return the most recent stash entry
pub fn pop_stash_entry(repo: &Repo) -> Result<Option<Hash>> {
    let mut entries = read_stash(repo)?;
    if entries.is_empty() {
        return Ok(None);
    }
    let top = entries.remove(0);
    write_stash(repo, &entries)?;
    Ok(Some(top))
}

/// return the most recent stash entry without removing it
pub fn peek_stash_entry(repo: &Repo) -> Result<Option<Hash>> {
    Ok(read_stash(repo)?.into_iter().next())
}

fn read_ref_file(path: &PathBuf, not_found: impl FnOnce() -> Error) -> Result<Hash> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_found()
        } else {
            Error::Io {
                path: path.clone(),
                source: e,
            }
        }
    })?;
    Hash::from_hex(content.trim())
}

fn list_leaf_names(dir: &PathBuf) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if dir.exists() {
        collect_leaf_names(dir, dir, &mut names)?;
    }
    names.sort();
    Ok(names)
}

fn collect_leaf_names(base: &PathBuf, dir: &PathBuf, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();
        if path.is_dir() {
            collect_leaf_names(base, &path, names)?;
        } else if let Ok(rel) = path.strip_prefix(base) {
            names.push(rel.to_string_lossy().to_string());
        }
    }
    Ok(())
}

fn atomic_write(path: &PathBuf, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(content).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }
    fs::rename(&tmp_path, path).with_path(path)?;
    Ok(())
}

fn validate_ref_component(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidRef("empty ref name".to_string()));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidRef(format!(
            "ref name cannot start or end with '/': {}",
            name
        )));
    }
    if name.contains("//") || name.contains('\0') {
        return Err(Error::InvalidRef(format!("invalid ref name: {}", name)));
    }
    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidRef(format!("ref name cannot contain '.' or '..': {}", name)));
        }
    }
    Ok(())
}
