use crate::error::{Error, Result};
use crate::hash::{Hash, ObjectKind};
use crate::object::store::{object_exists, read_object, write_object};
use crate::repo::Repo;
use crate::types::Tree;

/// write a tree object. the body is the tree's canonical, sorted-key JSON
/// encoding.
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<Hash> {
    let body = serde_json::to_vec(tree)?;
    write_object(repo, ObjectKind::Tree, &body)
}

pub fn read_tree(repo: &Repo, id: &Hash) -> Result<Tree> {
    let (kind, body) = read_object(repo, id)?;
    if kind != ObjectKind::Tree {
        return Err(Error::CorruptObject(*id, format!("expected tree, found {}", kind)));
    }
    let tree: Tree = serde_json::from_slice(&body)
        .map_err(|e| Error::CorruptObject(*id, format!("malformed tree body: {}", e)))?;
    Ok(tree)
}

pub fn tree_exists(repo: &Repo, id: &Hash) -> bool {
    object_exists(repo, id)
}
