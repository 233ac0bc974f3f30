use crate::cursor::Cursor;
use crate::error::ChunkyError;

/// Header of a single chunk: 8-byte ASCII tag, version, body length, name
/// length, 8 reserved bytes, then the optional ASCII name.
///
/// `body_len` is relative to the cursor position immediately after the name
/// field. The chunk body occupies `[body_start, body_start + body_len)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: [u8; 8],
    pub version: u32,
    pub body_len: u32,
    pub name: String,
}

impl ChunkHeader {
    pub(crate) fn read(cursor: &mut Cursor<'_>) -> Result<ChunkHeader, ChunkyError> {
        let tag_string = cursor.read_ascii(8)?;
        let mut tag = [0u8; 8];
        tag.copy_from_slice(tag_string.as_bytes());

        let version = cursor.read_u32()?;
        let body_len = cursor.read_u32()?;
        let name_len = cursor.read_u32()?;
        cursor.read_bytes(8)?; // reserved

        let name = if name_len > 0 {
            cursor.read_ascii(name_len as usize)?
        } else {
            String::new()
        };

        Ok(ChunkHeader {
            tag,
            version,
            body_len,
            name,
        })
    }

    /// Container chunks carry a `FOLD*` tag; everything else is a leaf.
    #[inline(always)]
    pub fn is_fold(&self) -> bool {
        &self.tag[..4] == b"FOLD"
    }

    /// The tag as text. Always valid, the tag is checked as ASCII on read.
    #[inline(always)]
    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("????????")
    }
}
