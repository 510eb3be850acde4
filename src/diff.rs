use std::fmt;

use similar::{ChangeTag, TextDiff};

use crate::types::Tree;

/// kind of change a path underwent between two trees
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "A"),
            ChangeKind::Modified => write!(f, "M"),
            ChangeKind::Deleted => write!(f, "D"),
        }
    }
}

/// a single path's change between two trees
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffEntry {
    pub path: String,
    pub kind: ChangeKind,
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path)
    }
}

/// compare two trees path-by-path. a path present only in
/// `to` is Added, present only in `from` is Deleted, present in both with
/// a different blob id is Modified. unchanged paths are omitted.
pub fn tree_delta(from: &Tree, to: &Tree) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for (path, hash) in to.iter() {
        match from.get(path) {
            None => entries.push(DiffEntry {
                path: path.clone(),
                kind: ChangeKind::Added,
            }),
            Some(existing) if existing != hash => entries.push(DiffEntry {
                path: path.clone(),
                kind: ChangeKind::Modified,
            }),
            _ => {}
        }
    }

    for path in from.paths() {
        if to.get(path).is_none() {
            entries.push(DiffEntry {
                path: path.clone(),
                kind: ChangeKind::Deleted,
            });
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

/// a unified line diff between two text blobs, using `similar`'s
/// Myers-style diff to compute a minimal edit script.
/// non-UTF-8 content is out of scope for this helper — callers should
/// fall back to reporting a binary change instead.
pub fn file_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(sign);
        out.push_str(&change.to_string());
    }
    out
}
