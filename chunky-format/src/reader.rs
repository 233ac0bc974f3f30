use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::de::parse_replay;
use crate::error::OpenError;
use crate::meta::ReplayMetadata;

/// Opens a replay file and parses its Chunky header region in one pass.
///
/// The file is memory-mapped for the duration of the parse; only the
/// extracted record is kept afterwards. The parse itself never touches the
/// filesystem, so [`parse_replay`](crate::parse_replay) can be used directly
/// on buffers obtained elsewhere.
#[derive(Debug)]
pub struct ReplayFileReader {
    path: PathBuf,
    meta: ReplayMetadata,
}

impl ReplayFileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ReplayFileReader, OpenError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let meta = parse_replay(&mmap)?;

        tracing::debug!(
            path = %path.display(),
            len = mmap.len(),
            "parsed replay file"
        );

        Ok(ReplayFileReader {
            path: path.to_path_buf(),
            meta,
        })
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn metadata(&self) -> &ReplayMetadata {
        &self.meta
    }
}
