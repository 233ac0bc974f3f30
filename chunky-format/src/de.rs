//! Deserialization of the Chunky container embedded in replay files.
//!
//! The container is a tree of length-prefixed chunks: `FOLD*` chunks hold
//! further chunks, `DATA*` chunks hold typed payloads. Only a subset of leaf
//! types needs to be understood; everything else is skipped by seeking to the
//! chunk's declared end.

use tracing::debug;

use crate::chunk::ChunkHeader;
use crate::cursor::{Cursor, SeekFrom};
use crate::error::ChunkyError;
use crate::meta::ReplayMetadata;

/// The 12-byte signature that anchors the chunk region.
pub(crate) const CHUNKY_MAGIC: &[u8; 12] = b"Relic Chunky";

/// The only container format version this parser understands.
pub(crate) const CHUNKY_VERSION: u32 = 3;

/// Nesting beyond this is treated as malformed input rather than recursed
/// into. Real replays stay in single digits.
const MAX_DEPTH: usize = 64;

/// Parse the Chunky header region of a replay held in memory.
///
/// One synchronous depth-first pass over `data`. The game-command stream that
/// follows the header region is not touched. Any failure aborts the whole
/// parse; no partial metadata is returned.
pub fn parse_replay(data: &[u8]) -> Result<ReplayMetadata, ChunkyError> {
    let mut cursor = Cursor::new(data);
    let mut meta = ReplayMetadata::default();
    read_file_header(&mut cursor, &mut meta)?;
    parse_chunk(&mut cursor, &mut meta, 0)?;
    Ok(meta)
}

/// The fixed file header preceding the chunk tree.
fn read_file_header(
    cursor: &mut Cursor<'_>,
    meta: &mut ReplayMetadata,
) -> Result<(), ChunkyError> {
    meta.file_version = Some(cursor.read_u32()?);
    meta.file_magic = Some(cursor.read_ascii(8)?);
    meta.local_date = Some(cursor.read_utf16_nul()?);
    // The date field is padded so subsequent reads stay 4-byte aligned.
    cursor.seek(SeekFrom::Current(2))?;
    skip_u32s(cursor, 7)?;

    let signature_offset = cursor.position();
    let signature = cursor.read_bytes(CHUNKY_MAGIC.len())?;
    if signature != CHUNKY_MAGIC {
        let mut found = [0u8; 12];
        found.copy_from_slice(signature);
        return Err(ChunkyError::InvalidMagic {
            offset: signature_offset,
            found,
        });
    }
    skip_u32s(cursor, 1)?;

    let version_offset = cursor.position();
    let version = cursor.read_u32()?;
    if version != CHUNKY_VERSION {
        return Err(ChunkyError::UnsupportedVersion {
            version,
            offset: version_offset,
        });
    }
    meta.chunky_version = Some(version);
    skip_u32s(cursor, 1)?;

    let header_len = cursor.read_u32()?;
    meta.chunky_header_len = Some(header_len);

    // Rewind to the start of the signature (12 bytes plus four u32 reads
    // since), then skip the whole declared container header. That lands the
    // cursor on the first top-level chunk.
    cursor.seek(SeekFrom::Current(-28))?;
    cursor.seek(SeekFrom::Current(i64::from(header_len)))?;

    debug!(
        offset = format_args!("{:#x}", cursor.position()),
        version, header_len, "container header accepted"
    );
    Ok(())
}

/// Parse one chunk at `depth`, recursing into `FOLD*` containers.
///
/// Whatever the handler consumed, the final seek to `body_start + body_len`
/// is unconditional: the declared length is authoritative, which is what
/// makes chunk types without a handler safe to traverse past.
fn parse_chunk(
    cursor: &mut Cursor<'_>,
    meta: &mut ReplayMetadata,
    depth: usize,
) -> Result<(), ChunkyError> {
    if depth > MAX_DEPTH {
        return Err(ChunkyError::TooDeeplyNested {
            offset: cursor.position(),
            max: MAX_DEPTH,
        });
    }

    let start = cursor.position();
    let header = ChunkHeader::read(cursor)?;
    let body_start = cursor.position();
    let body_end = body_start + header.body_len as usize;

    debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", body_end),
        bytes = header.body_len,
        tag = header.tag_str(),
        version = header.version,
        depth,
        "parsing chunk"
    );

    if header.is_fold() {
        // Children are self-delimiting; discover them by repeated invocation
        // until the declared body is exhausted.
        while cursor.position() < body_end {
            parse_chunk(cursor, meta, depth + 1)?;
        }
    } else if &header.tag == b"DATASDSC" && header.version == 2004 {
        read_scenario_descriptor(cursor, meta)?;
    }

    cursor.seek(SeekFrom::Start(body_end))?;
    Ok(())
}

/// `DATASDSC` version 2004: the scenario descriptor.
///
/// Field order is fixed. The unidentified u32 runs between the known fields
/// are undocumented in the format; they are preserved as opaque skips.
fn read_scenario_descriptor(
    cursor: &mut Cursor<'_>,
    meta: &mut ReplayMetadata,
) -> Result<(), ChunkyError> {
    skip_u32s(cursor, 1)?;
    meta.unknown_date = Some(cursor.read_length_utf16()?);
    skip_u32s(cursor, 3)?;
    meta.mod_name = Some(cursor.read_length_ascii()?);
    meta.map_file_name = Some(cursor.read_length_ascii()?);
    skip_u32s(cursor, 5)?;
    meta.map_name = Some(cursor.read_length_utf16()?);
    skip_u32s(cursor, 1)?;
    meta.map_description = Some(cursor.read_length_utf16()?);
    skip_u32s(cursor, 1)?;
    meta.map_width = Some(cursor.read_u32()?);
    meta.map_height = Some(cursor.read_u32()?);
    skip_u32s(cursor, 3)?;

    debug!(
        map = meta.map_name.as_deref().unwrap_or(""),
        width = meta.map_width,
        height = meta.map_height,
        "read scenario descriptor"
    );
    Ok(())
}

/// Read and discard `count` reserved u32 fields.
fn skip_u32s(cursor: &mut Cursor<'_>, count: usize) -> Result<(), ChunkyError> {
    for _ in 0..count {
        cursor.read_u32()?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testdata::*;
    use super::*;

    #[test]
    fn parses_semois_metadata() {
        let meta = parse_replay(&semois_replay()).unwrap();

        assert_eq!(meta.file_version, Some(10));
        assert_eq!(meta.file_magic.as_deref(), Some("COH__REC"));
        assert_eq!(meta.chunky_version, Some(3));
        assert_eq!(meta.chunky_header_len, Some(28));
        assert_eq!(meta.local_date.as_deref(), Some("24.08.2007"));
        assert_eq!(meta.unknown_date.as_deref(), Some("2007-08-24"));
        assert_eq!(meta.mod_name.as_deref(), Some("RelicCOH"));
        assert_eq!(
            meta.map_file_name.as_deref(),
            Some("Data:scenarios\\mp\\2p_semois")
        );
        assert_eq!(meta.map_name.as_deref(), Some("Semois"));
        assert_eq!(meta.map_description.as_deref(), Some("A small village map."));
        assert_eq!(meta.map_width, Some(4));
        assert_eq!(meta.map_height, Some(4));
        assert!(meta.other.is_empty());
    }

    #[test]
    fn corrupted_signature_is_invalid_magic() {
        let err = parse_replay(&file_header_with(b"Relic Chunkz", 3)).unwrap_err();
        assert!(matches!(err, ChunkyError::InvalidMagic { .. }));
    }

    #[test]
    fn wrong_container_version_is_rejected() {
        let err = parse_replay(&file_header_with(b"Relic Chunky", 5)).unwrap_err();
        assert!(matches!(
            err,
            ChunkyError::UnsupportedVersion { version: 5, .. }
        ));
    }

    #[test]
    fn truncated_header_is_eof() {
        let err = parse_replay(&[0x01, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, ChunkyError::UnexpectedEof { .. }));
    }

    /// The resync law: after a chunk-walk invocation returns, the cursor sits
    /// exactly at `body_start + body_len`, whatever the chunk was.
    #[test]
    fn walk_always_lands_on_declared_end() {
        let unknown = chunk(b"DATAINFO", 1, "", &[0xab; 16]);
        let known = chunk(b"DATASDSC", 2004, "", &scenario_body());
        let empty_fold = chunk(b"FOLDPOST", 1, "", &[]);
        let nested = chunk(b"FOLDFOLD", 1, "", &known);

        for data in [&unknown, &known, &empty_fold, &nested] {
            let mut cursor = Cursor::new(data);
            let mut meta = ReplayMetadata::default();
            parse_chunk(&mut cursor, &mut meta, 0).unwrap();
            assert_eq!(cursor.position(), data.len());
        }
    }

    #[test]
    fn oversized_declared_length_is_absorbed() {
        // 12 slack bytes after the descriptor fields; the declared length
        // still governs the chunk's extent.
        let mut body = scenario_body();
        body.extend_from_slice(&[0u8; 12]);
        let leaf = chunk(b"DATASDSC", 2004, "", &body);

        let mut buf = file_header();
        buf.extend_from_slice(&chunk(b"FOLDFOLD", 1, "", &leaf));

        let meta = parse_replay(&buf).unwrap();
        assert_eq!(meta.map_name.as_deref(), Some("Semois"));
    }

    #[test]
    fn unknown_leaf_is_skipped_and_siblings_still_parsed() {
        let mut body = chunk(b"DATAINFO", 7, "", &[0xff; 24]);
        body.extend_from_slice(&chunk(b"DATASDSC", 2004, "", &scenario_body()));

        let mut buf = file_header();
        buf.extend_from_slice(&chunk(b"FOLDFOLD", 1, "", &body));

        let meta = parse_replay(&buf).unwrap();
        assert_eq!(meta.map_name.as_deref(), Some("Semois"));
        assert_eq!(meta.map_width, Some(4));
        assert!(meta.other.is_empty());
    }

    #[test]
    fn fold_visits_children_in_order() {
        // Two recognized leaves; the later one wins each field, proving both
        // were visited and in order.
        let first = scenario_body();
        let mut second = Vec::new();
        push_u32(&mut second, 0);
        push_length_utf16(&mut second, "2007-08-25");
        for _ in 0..3 {
            push_u32(&mut second, 0);
        }
        push_length_ascii(&mut second, "RelicCOH");
        push_length_ascii(&mut second, "Data:scenarios\\mp\\4p_wrecked");
        for _ in 0..5 {
            push_u32(&mut second, 0);
        }
        push_length_utf16(&mut second, "Wrecked Train");
        push_u32(&mut second, 0);
        push_length_utf16(&mut second, "A larger map.");
        push_u32(&mut second, 0);
        push_u32(&mut second, 8);
        push_u32(&mut second, 8);
        for _ in 0..3 {
            push_u32(&mut second, 0);
        }

        let mut body = chunk(b"DATASDSC", 2004, "", &first);
        body.extend_from_slice(&chunk(b"DATASDSC", 2004, "", &second));

        let mut buf = file_header();
        buf.extend_from_slice(&chunk(b"FOLDFOLD", 1, "", &body));

        let meta = parse_replay(&buf).unwrap();
        assert_eq!(meta.map_name.as_deref(), Some("Wrecked Train"));
        assert_eq!(meta.map_width, Some(8));
    }

    #[test]
    fn runaway_nesting_trips_the_depth_guard() {
        let mut buf = chunk(b"DATAXXXX", 1, "", &[]);
        for _ in 0..70 {
            buf = chunk(b"FOLDFOLD", 1, "", &buf);
        }

        let mut cursor = Cursor::new(&buf);
        let mut meta = ReplayMetadata::default();
        let err = parse_chunk(&mut cursor, &mut meta, 0).unwrap_err();
        assert!(matches!(err, ChunkyError::TooDeeplyNested { .. }));
    }

    #[test]
    fn named_chunks_parse_like_unnamed_ones() {
        let leaf = chunk(b"DATASDSC", 2004, "sdsc", &scenario_body());

        let mut buf = file_header();
        buf.extend_from_slice(&chunk(b"FOLDFOLD", 1, "info", &leaf));

        let meta = parse_replay(&buf).unwrap();
        assert_eq!(meta.map_name.as_deref(), Some("Semois"));
    }
}
