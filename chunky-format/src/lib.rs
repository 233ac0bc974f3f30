//! Reader for the Relic Chunky container embedded in Company of Heroes
//! replay files.
//!
//! Use [`parse_replay`] on an in-memory buffer, or [`ReplayFileReader`] to
//! open a replay file directly. The parser walks the recursive chunk tree of
//! the header region and extracts map and mod metadata; the game-command
//! stream that follows is out of scope.

mod chunk;
mod cursor;
mod de;
mod error;
mod meta;
mod reader;

pub use chunk::ChunkHeader;
pub use cursor::{Cursor, SeekFrom};
pub use de::parse_replay;
pub use error::{ChunkyError, OpenError};
pub use meta::ReplayMetadata;
pub use reader::ReplayFileReader;
