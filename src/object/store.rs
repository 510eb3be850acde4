use std::fs::{self, File};
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{compute_object_id, Hash, ObjectKind};
use crate::repo::Repo;

/// write a framed, DEFLATE-compressed object body to the store.
///
/// idempotent: since the id is content-derived, writing the same
/// (kind, body) pair twice is a no-op on the second call.
pub fn write_object(repo: &Repo, kind: ObjectKind, body: &[u8]) -> Result<Hash> {
    let (id, framed) = compute_object_id(kind, body);
    let path = repo.object_path(&id);

    if path.exists() {
        return Ok(id);
    }

    let objects_dir = repo.objects_path();
    fs::create_dir_all(&objects_dir).with_path(&objects_dir)?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&framed).with_path(&path)?;
    let compressed = encoder.finish().with_path(&path)?;

    let tmp_path = objects_dir.join(format!(".{}.tmp", id.to_hex()));
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(&compressed).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }
    fs::rename(&tmp_path, &path).with_path(&path)?;

    log::trace!("wrote {} object {}", kind, id);
    Ok(id)
}

/// read and inflate an object, verifying its frame and content hash.
/// returns the object's kind and raw body.
pub fn read_object(repo: &Repo, id: &Hash) -> Result<(ObjectKind, Vec<u8>)> {
    let path = repo.object_path(id);

    let compressed = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*id)
        } else {
            Error::Io {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut framed = Vec::new();
    decoder
        .read_to_end(&mut framed)
        .map_err(|e| Error::CorruptObject(*id, format!("failed to inflate: {}", e)))?;

    let header_end = framed
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::CorruptObject(*id, "missing header terminator".to_string()))?;

    let header = std::str::from_utf8(&framed[..header_end])
        .map_err(|_| Error::CorruptObject(*id, "header is not valid utf-8".to_string()))?;

    let mut parts = header.splitn(2, ' ');
    let kind_str = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::CorruptObject(*id, "empty header".to_string()))?;
    let len_str = parts
        .next()
        .ok_or_else(|| Error::CorruptObject(*id, "missing length field".to_string()))?;

    let kind = ObjectKind::parse(kind_str)
        .ok_or_else(|| Error::CorruptObject(*id, format!("unknown object kind '{}'", kind_str)))?;
    let len: usize = len_str
        .parse()
        .map_err(|_| Error::CorruptObject(*id, format!("invalid length '{}'", len_str)))?;

    let body = framed[header_end + 1..].to_vec();
    if body.len() != len {
        return Err(Error::CorruptObject(
            *id,
            format!("length mismatch: header says {}, body is {}", len, body.len()),
        ));
    }

    let (actual_id, _) = compute_object_id(kind, &body);
    if actual_id != *id {
        return Err(Error::CorruptObject(*id, "content hash mismatch".to_string()));
    }

    Ok((kind, body))
}

/// check whether an object id is present in the store, without reading it.
pub fn object_exists(repo: &Repo, id: &Hash) -> bool {
    repo.object_path(id).exists()
}
