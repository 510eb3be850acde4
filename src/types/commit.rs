use crate::hash::Hash;

/// a commit object: a tree snapshot plus history and identity.
///
/// `author`/`committer` mirror the two identity lines in the on-disk
/// grammar (§6); pygit never distinguishes them in practice (there is no
/// patch-apply flow that would make them diverge) but the grammar carries
/// both, so the type does too.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub tree: Hash,
    pub parents: Vec<Hash>,
    pub author: String,
    pub author_time: i64,
    pub committer: String,
    pub committer_time: i64,
    pub message: String,
}

impl Commit {
    pub fn new(
        tree: Hash,
        parents: Vec<Hash>,
        identity: impl Into<String>,
        timestamp: i64,
        message: impl Into<String>,
    ) -> Self {
        let identity = identity.into();
        Self {
            tree,
            parents,
            author: identity.clone(),
            author_time: timestamp,
            committer: identity,
            committer_time: timestamp,
            message: message.into(),
        }
    }

    /// is this the first commit in its line of history
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// does this commit have more than one parent
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_new() {
        let c = Commit::new(Hash::ZERO, vec![], "jane <jane@example.com>", 100, "initial");
        assert!(c.is_root());
        assert!(!c.is_merge());
        assert_eq!(c.author, c.committer);
    }

    #[test]
    fn test_commit_merge_detection() {
        let p1 = Hash::ZERO;
        let p2 = Hash::ZERO;
        let c = Commit::new(Hash::ZERO, vec![p1, p2], "jane", 100, "merge");
        assert!(c.is_merge());
        assert!(!c.is_root());
    }
}
