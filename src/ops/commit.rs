use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::hash::Hash;
use crate::index::read_index;
use crate::object::{read_commit, write_commit, write_tree};
use crate::refs::{self, Head};
use crate::repo::Repo;
use crate::types::Commit;

/// the identity string written into author/committer lines, taken from
/// `user.name`/`user.email` in repository config.
pub fn current_identity(repo: &Repo) -> Result<String> {
    let config = repo.config()?;
    let name = config.get("user.name").unwrap_or("unknown").to_string();
    let email = config
        .get("user.email")
        .unwrap_or("unknown@localhost")
        .to_string();
    Ok(format!("{} <{}>", name, email))
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// snapshot the current index into a new commit on whatever HEAD points
/// at, advancing the attached branch (or HEAD itself, if detached).
pub fn commit(repo: &Repo, message: &str) -> Result<Hash> {
    let index = read_index(repo)?;
    let tree_id = write_tree(repo, &index)?;

    let parents = match refs::read_head(repo)? {
        Head::Attached(ref branch) if refs::branch_exists(repo, branch) => {
            vec![refs::branch_commit(repo, branch)?]
        }
        Head::Attached(_) => vec![],
        Head::Detached(id) => vec![id],
    };

    let identity = current_identity(repo)?;
    let commit = Commit::new(tree_id, parents, identity, now(), message);
    let commit_id = write_commit(repo, &commit)?;

    match refs::read_head(repo)? {
        Head::Attached(branch) => refs::write_branch(repo, &branch, &commit_id)?,
        Head::Detached(_) => refs::write_head_detached(repo, &commit_id)?,
    }

    Ok(commit_id)
}
