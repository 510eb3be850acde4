use crate::error::{Error, Result};
use crate::hash::{Hash, ObjectKind};
use crate::object::store::{object_exists, read_object, write_object};
use crate::repo::Repo;
use crate::types::Commit;

/// serialize a commit to its line-oriented grammar:
///
/// ```text
/// tree <hex>
/// parent <hex>      (zero or more, in parent order)
/// author <identity> <timestamp>
/// committer <identity> <timestamp>
///
/// <message>
/// ```
///
/// no `parent None` sentinel line is ever written; a root commit simply
/// has zero `parent` lines.
pub fn encode_commit(commit: &Commit) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&format!("tree {}\n", commit.tree));
    for parent in &commit.parents {
        out.push_str(&format!("parent {}\n", parent));
    }
    out.push_str(&format!("author {} {}\n", commit.author, commit.author_time));
    out.push_str(&format!(
        "committer {} {}\n",
        commit.committer, commit.committer_time
    ));
    out.push('\n');
    out.push_str(&commit.message);
    out.into_bytes()
}

pub fn decode_commit(id: &Hash, body: &[u8]) -> Result<Commit> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::CorruptObject(*id, "commit body is not utf-8".to_string()))?;

    let (header, message) = text
        .split_once("\n\n")
        .ok_or_else(|| Error::CorruptObject(*id, "missing header/message separator".to_string()))?;

    let mut tree = None;
    let mut parents = Vec::new();
    let mut author = None;
    let mut committer = None;

    for line in header.lines() {
        if let Some(rest) = line.strip_prefix("tree ") {
            tree = Some(
                Hash::from_hex(rest)
                    .map_err(|_| Error::CorruptObject(*id, format!("bad tree hash: {}", rest)))?,
            );
        } else if let Some(rest) = line.strip_prefix("parent ") {
            parents.push(
                Hash::from_hex(rest)
                    .map_err(|_| Error::CorruptObject(*id, format!("bad parent hash: {}", rest)))?,
            );
        } else if let Some(rest) = line.strip_prefix("author ") {
            author = Some(parse_identity_line(id, rest)?);
        } else if let Some(rest) = line.strip_prefix("committer ") {
            committer = Some(parse_identity_line(id, rest)?);
        } else {
            return Err(Error::CorruptObject(*id, format!("unexpected header line: {}", line)));
        }
    }

    let tree = tree.ok_or_else(|| Error::CorruptObject(*id, "missing tree line".to_string()))?;
    let (author, author_time) =
        author.ok_or_else(|| Error::CorruptObject(*id, "missing author line".to_string()))?;
    let (committer, committer_time) =
        committer.ok_or_else(|| Error::CorruptObject(*id, "missing committer line".to_string()))?;

    Ok(Commit {
        tree,
        parents,
        author,
        author_time,
        committer,
        committer_time,
        message: message.to_string(),
    })
}

/// identity lines are `<identity> <timestamp>`; identity may contain
/// spaces, so split at the *last* space rather than the first.
fn parse_identity_line(id: &Hash, rest: &str) -> Result<(String, i64)> {
    let (identity, ts) = rest
        .rsplit_once(' ')
        .ok_or_else(|| Error::CorruptObject(*id, format!("malformed identity line: {}", rest)))?;
    let ts: i64 = ts
        .parse()
        .map_err(|_| Error::CorruptObject(*id, format!("bad timestamp: {}", ts)))?;
    Ok((identity.to_string(), ts))
}

pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let body = encode_commit(commit);
    write_object(repo, ObjectKind::Commit, &body)
}

pub fn read_commit(repo: &Repo, id: &Hash) -> Result<Commit> {
    let (kind, body) = read_object(repo, id)?;
    if kind != ObjectKind::Commit {
        return Err(Error::CorruptObject(*id, format!("expected commit, found {}", kind)));
    }
    decode_commit(id, &body)
}

pub fn commit_exists(repo: &Repo, id: &Hash) -> bool {
    object_exists(repo, id)
}
