use thiserror::Error;

/// Failures while decoding a Chunky container.
///
/// Every variant carries enough position information for the caller to report
/// the byte offset at which the parse died. All of these abort the parse as a
/// whole; unrecognized chunk types are not errors (they are skipped by the
/// boundary resynchronization in the chunk walk).
#[derive(Debug, Error)]
pub enum ChunkyError {
    #[error("unexpected end of data at offset {offset:#x}: needed {needed} more bytes")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("seek target {target} outside buffer of {len} bytes")]
    SeekOutOfBounds { target: i64, len: usize },

    #[error("invalid {encoding} data at offset {offset:#x}")]
    InvalidEncoding {
        encoding: &'static str,
        offset: usize,
    },

    #[error("invalid container signature at offset {offset:#x}: expected \"Relic Chunky\"")]
    InvalidMagic { offset: usize, found: [u8; 12] },

    #[error("unsupported container version {version} at offset {offset:#x} (only version 3 is supported)")]
    UnsupportedVersion { version: u32, offset: usize },

    #[error("chunk nesting deeper than {max} levels at offset {offset:#x}")]
    TooDeeplyNested { offset: usize, max: usize },
}

/// Failures while opening and parsing a replay file from disk.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("cannot read replay file")]
    Io(#[from] std::io::Error),

    #[error("cannot parse replay file")]
    Parse(#[from] ChunkyError),
}
