use crate::hash::{Hash, ObjectKind};

/// an annotated tag object: a named, dated pointer at another object with
/// a message, distinct from a lightweight ref.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub object: Hash,
    pub kind: ObjectKind,
    pub tag: String,
    pub tagger: String,
    pub tag_time: i64,
    pub message: String,
}

impl Tag {
    pub fn new(
        object: Hash,
        kind: ObjectKind,
        tag: impl Into<String>,
        tagger: impl Into<String>,
        tag_time: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object,
            kind,
            tag: tag.into(),
            tagger: tagger.into(),
            tag_time,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let t = Tag::new(Hash::ZERO, ObjectKind::Commit, "v1.0", "jane", 100, "release");
        assert_eq!(t.tag, "v1.0");
        assert_eq!(t.kind, ObjectKind::Commit);
    }
}
