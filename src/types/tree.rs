use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// a tree object: a flat mapping of repository-relative paths to blob ids.
///
/// unlike a nested filesystem tree, pygit trees are flat — a path like
/// `src/main.rs` is a single key, not a walk through intermediate
/// directory entries. serializing a `BTreeMap` with `serde_json` already
/// produces keys in sorted order, which is what gives the tree body a
/// canonical, hash-stable encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree(BTreeMap<String, Hash>);

impl Tree {
    pub fn new(entries: BTreeMap<String, Hash>) -> Self {
        Self(entries)
    }

    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, path: &str) -> Option<&Hash> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, blob: Hash) -> Option<Hash> {
        self.0.insert(path.into(), blob)
    }

    pub fn remove(&mut self, path: &str) -> Option<Hash> {
        self.0.remove(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Hash)> {
        self.0.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Hash> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, Hash> {
        self.0
    }
}

impl FromIterator<(String, Hash)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Hash)>>(iter: I) -> Self {
        Self(BTreeMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_empty() {
        let t = Tree::empty();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_tree_insert_get_remove() {
        let mut t = Tree::empty();
        t.insert("src/main.rs", Hash::ZERO);
        assert_eq!(t.get("src/main.rs"), Some(&Hash::ZERO));
        assert!(t.contains("src/main.rs"));

        t.remove("src/main.rs");
        assert!(!t.contains("src/main.rs"));
    }

    #[test]
    fn test_tree_json_is_sorted() {
        let mut t = Tree::empty();
        t.insert("zebra", Hash::ZERO);
        t.insert("alpha", Hash::ZERO);
        t.insert("mid", Hash::ZERO);

        let json = serde_json::to_string(&t).unwrap();
        let alpha_pos = json.find("alpha").unwrap();
        let mid_pos = json.find("mid").unwrap();
        let zebra_pos = json.find("zebra").unwrap();
        assert!(alpha_pos < mid_pos);
        assert!(mid_pos < zebra_pos);
    }

    #[test]
    fn test_tree_json_roundtrip() {
        let mut t = Tree::empty();
        t.insert("a.txt", Hash::ZERO);
        t.insert("dir/b.txt", Hash::ZERO);

        let json = serde_json::to_string(&t).unwrap();
        let parsed: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(t, parsed);
    }

    #[test]
    fn test_tree_encoding_is_order_independent() {
        let mut t1 = Tree::empty();
        t1.insert("b", Hash::ZERO);
        t1.insert("a", Hash::ZERO);

        let mut t2 = Tree::empty();
        t2.insert("a", Hash::ZERO);
        t2.insert("b", Hash::ZERO);

        let j1 = serde_json::to_string(&t1).unwrap();
        let j2 = serde_json::to_string(&t2).unwrap();
        assert_eq!(j1, j2);
    }
}
