use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

use crate::Error;

/// SHA-1 object id used for content addressing, 40 hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 20]);

impl Hash {
    /// zero hash (useful as sentinel, never a real object id)
    pub const ZERO: Hash = Hash([0u8; 20]);

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// parse from a 40-character hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidHashHex(s.to_string()))?;
        if bytes.len() != 20 {
            return Err(Error::InvalidHashHex(s.to_string()));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// convert to a 40-character hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..7])
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// the object kinds carried in the framed header, see `object::store`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectKind::Blob),
            "tree" => Some(ObjectKind::Tree),
            "commit" => Some(ObjectKind::Commit),
            "tag" => Some(ObjectKind::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// frame a body with `<kind> <len>\0` and hash the uncompressed stream.
///
/// an object's id is the sha-1 hex digest of the *uncompressed*
/// header+body stream. compression happens only at rest.
pub fn compute_object_id(kind: ObjectKind, body: &[u8]) -> (Hash, Vec<u8>) {
    let header = format!("{} {}\0", kind.as_str(), body.len());
    let mut framed = Vec::with_capacity(header.len() + body.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(body);

    let mut hasher = Sha1::new();
    hasher.update(&framed);
    let digest: [u8; 20] = hasher.finalize().into();

    (Hash(digest), framed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_hex_roundtrip() {
        let original = Hash::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();
        let hex = original.to_hex();
        let parsed = Hash::from_hex(&hex).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_hash_invalid_hex() {
        assert!(Hash::from_hex("not valid hex").is_err());
        assert!(Hash::from_hex("abcd").is_err());
        assert!(Hash::from_hex("abcdef0123456789abcdef0123456789abcdef01ff").is_err());
    }

    #[test]
    fn test_hash_ordering() {
        let h1 = Hash::from_hex("0000000000000000000000000000000000000001").unwrap();
        let h2 = Hash::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(h1 < h2);
    }

    #[test]
    fn test_compute_object_id_determinism() {
        let (h1, framed1) = compute_object_id(ObjectKind::Blob, b"hello");
        let (h2, framed2) = compute_object_id(ObjectKind::Blob, b"hello");
        assert_eq!(h1, h2);
        assert_eq!(framed1, framed2);
        assert_eq!(framed1, b"blob 5\0hello");
    }

    #[test]
    fn test_compute_object_id_kind_sensitive() {
        let (h1, _) = compute_object_id(ObjectKind::Blob, b"hello");
        let (h2, _) = compute_object_id(ObjectKind::Tree, b"hello");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_hash_serde_json() {
        let h = Hash::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.contains("abcdef"));
        let parsed: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn test_object_kind_roundtrip() {
        for k in [
            ObjectKind::Blob,
            ObjectKind::Tree,
            ObjectKind::Commit,
            ObjectKind::Tag,
        ] {
            assert_eq!(ObjectKind::parse(k.as_str()), Some(k));
        }
        assert_eq!(ObjectKind::parse("bogus"), None);
    }
}
