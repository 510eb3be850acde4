use crate::dag::{ancestor_set, first_parent_history, lowest_common_ancestor};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::write_index;
use crate::object::{read_commit, read_tree, write_commit, write_tree};
use crate::refs::{self, Head};
use crate::repo::Repo;
use crate::resolver::resolve_to_commit;
use crate::types::Commit;

use super::checkout::materialize_tree;

/// replay the current branch's commits (since its divergence from
/// `onto`) on top of `onto`'s tip.
///
/// this is a tree-overlay replay, not a patch-apply: each replayed
/// commit's tree is laid over the running tree path-by-path, so a path
/// touched by both the upstream history and the replayed commit takes
/// the replayed commit's version. `log::warn!` records every such
/// overwrite since it happens silently otherwise.
pub fn rebase(repo: &Repo, onto: &str) -> Result<Hash> {
    let current_branch = match refs::read_head(repo)? {
        Head::Attached(branch) => branch,
        Head::Detached(_) => return Err(Error::DetachedHead),
    };

    let ours = refs::branch_commit(repo, &current_branch)?;
    let target = resolve_to_commit(repo, onto)?;

    if ours == target {
        return Ok(target);
    }

    let base = lowest_common_ancestor(repo, ours, target)?
        .ok_or(Error::NoCommonAncestor(ours, target))?;

    if base == ours {
        refs::write_branch(repo, &current_branch, &target)?;
        materialize_branch(repo, &current_branch)?;
        return Ok(target);
    }

    let target_ancestors = ancestor_set(repo, target)?;
    let mut to_replay: Vec<Hash> = first_parent_history(repo, ours)?
        .into_iter()
        .take_while(|id| *id != base && !target_ancestors.contains(id))
        .collect();
    to_replay.reverse();

    let mut parent = target;
    let mut tree = read_tree(repo, &read_commit(repo, &target)?.tree)?;

    for commit_id in to_replay {
        let original = read_commit(repo, &commit_id)?;
        let original_tree = read_tree(repo, &original.tree)?;

        for (path, hash) in original_tree.iter() {
            if let Some(existing) = tree.get(path) {
                if existing != hash {
                    log::warn!(
                        "rebase: {} overwritten while replaying {}",
                        path,
                        commit_id
                    );
                }
            }
            tree.insert(path.clone(), *hash);
        }

        let tree_id = write_tree(repo, &tree)?;
        let replayed = Commit::new(
            tree_id,
            vec![parent],
            original.author.clone(),
            original.author_time,
            original.message.clone(),
        );
        parent = write_commit(repo, &replayed)?;
    }

    refs::write_branch(repo, &current_branch, &parent)?;
    materialize_branch(repo, &current_branch)?;

    Ok(parent)
}

fn materialize_branch(repo: &Repo, branch: &str) -> Result<()> {
    let id = refs::branch_commit(repo, branch)?;
    let tree = read_tree(repo, &read_commit(repo, &id)?.tree)?;
    materialize_tree(repo, &tree)?;
    write_index(repo, &tree)
}
