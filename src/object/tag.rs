use crate::error::{Error, Result};
use crate::hash::{Hash, ObjectKind};
use crate::object::store::{object_exists, read_object, write_object};
use crate::repo::Repo;
use crate::types::Tag;

/// serialize an annotated tag to its line-oriented grammar:
///
/// ```text
/// object <hex>
/// type <kind>
/// tag <name>
/// tagger <identity> <timestamp>
///
/// <message>
/// ```
pub fn encode_tag(tag: &Tag) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&format!("object {}\n", tag.object));
    out.push_str(&format!("type {}\n", tag.kind));
    out.push_str(&format!("tag {}\n", tag.tag));
    out.push_str(&format!("tagger {} {}\n", tag.tagger, tag.tag_time));
    out.push('\n');
    out.push_str(&tag.message);
    out.into_bytes()
}

pub fn decode_tag(id: &Hash, body: &[u8]) -> Result<Tag> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::CorruptObject(*id, "tag body is not utf-8".to_string()))?;

    let (header, message) = text
        .split_once("\n\n")
        .ok_or_else(|| Error::CorruptObject(*id, "missing header/message separator".to_string()))?;

    let mut object = None;
    let mut kind = None;
    let mut tag_name = None;
    let mut tagger = None;

    for line in header.lines() {
        if let Some(rest) = line.strip_prefix("object ") {
            object = Some(
                Hash::from_hex(rest)
                    .map_err(|_| Error::CorruptObject(*id, format!("bad object hash: {}", rest)))?,
            );
        } else if let Some(rest) = line.strip_prefix("type ") {
            kind = Some(
                ObjectKind::parse(rest)
                    .ok_or_else(|| Error::CorruptObject(*id, format!("unknown object kind: {}", rest)))?,
            );
        } else if let Some(rest) = line.strip_prefix("tag ") {
            tag_name = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("tagger ") {
            let (identity, ts) = rest
                .rsplit_once(' ')
                .ok_or_else(|| Error::CorruptObject(*id, format!("malformed tagger line: {}", rest)))?;
            let ts: i64 = ts
                .parse()
                .map_err(|_| Error::CorruptObject(*id, format!("bad timestamp: {}", ts)))?;
            tagger = Some((identity.to_string(), ts));
        } else {
            return Err(Error::CorruptObject(*id, format!("unexpected header line: {}", line)));
        }
    }

    let object = object.ok_or_else(|| Error::CorruptObject(*id, "missing object line".to_string()))?;
    let kind = kind.ok_or_else(|| Error::CorruptObject(*id, "missing type line".to_string()))?;
    let tag_name = tag_name.ok_or_else(|| Error::CorruptObject(*id, "missing tag line".to_string()))?;
    let (tagger, tag_time) =
        tagger.ok_or_else(|| Error::CorruptObject(*id, "missing tagger line".to_string()))?;

    Ok(Tag {
        object,
        kind,
        tag: tag_name,
        tagger,
        tag_time,
        message: message.to_string(),
    })
}

pub fn write_tag(repo: &Repo, tag: &Tag) -> Result<Hash> {
    let body = encode_tag(tag);
    write_object(repo, ObjectKind::Tag, &body)
}

pub fn read_tag(repo: &Repo, id: &Hash) -> Result<Tag> {
    let (kind, body) = read_object(repo, id)?;
    if kind != ObjectKind::Tag {
        return Err(Error::CorruptObject(*id, format!("expected tag, found {}", kind)));
    }
    decode_tag(id, &body)
}

pub fn tag_exists(repo: &Repo, id: &Hash) -> bool {
    object_exists(repo, id)
}
