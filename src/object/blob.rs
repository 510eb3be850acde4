use crate::error::Result;
use crate::hash::{Hash, ObjectKind};
use crate::object::store::{object_exists, read_object, write_object};
use crate::repo::Repo;

/// write opaque file content as a blob object
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Hash> {
    write_object(repo, ObjectKind::Blob, content)
}

/// read a blob's raw content
pub fn read_blob(repo: &Repo, id: &Hash) -> Result<Vec<u8>> {
    let (kind, body) = read_object(repo, id)?;
    expect_kind(repo, id, kind)?;
    Ok(body)
}

pub fn blob_exists(repo: &Repo, id: &Hash) -> bool {
    object_exists(repo, id)
}

fn expect_kind(_repo: &Repo, id: &Hash, kind: ObjectKind) -> Result<()> {
    if kind != ObjectKind::Blob {
        return Err(crate::error::Error::CorruptObject(
            *id,
            format!("expected blob, found {}", kind),
        ));
    }
    Ok(())
}
