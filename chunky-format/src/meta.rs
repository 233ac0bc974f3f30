use std::collections::HashMap;
use std::fmt;

/// Everything the parser extracts from a replay's Chunky header region.
///
/// All fields start unset. Each is written at most once, by the one chunk
/// handler that recognizes its chunk type and version; chunks without a
/// handler leave the record untouched. The record is complete once the chunk
/// tree has been traversed and is read-only thereafter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayMetadata {
    /// Replay file version, the first field of the file.
    pub file_version: Option<u32>,
    /// 8-byte tag following the file version. Recorded for diagnostics only;
    /// a mismatch is not treated as corruption.
    pub file_magic: Option<String>,
    /// Container format version. Always 3 on a successful parse.
    pub chunky_version: Option<u32>,
    /// Declared length of the container header, in bytes from the signature.
    pub chunky_header_len: Option<u32>,
    /// Capture date as written by the game, e.g. `24.08.2007 21:16`.
    pub local_date: Option<String>,
    /// Free-form date string from the scenario descriptor.
    pub unknown_date: Option<String>,
    pub mod_name: Option<String>,
    pub map_name: Option<String>,
    pub map_description: Option<String>,
    pub map_file_name: Option<String>,
    pub map_width: Option<u32>,
    pub map_height: Option<u32>,
    /// Key/value fields from chunk types with no dedicated handler.
    pub other: HashMap<String, String>,
}

fn line<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, value: &Option<T>) -> fmt::Result {
    match value {
        Some(value) => writeln!(f, "{:<18}: {}", name, value),
        None => writeln!(f, "{:<18}: -", name),
    }
}

impl fmt::Display for ReplayMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        line(f, "file version", &self.file_version)?;
        line(f, "file magic", &self.file_magic)?;
        line(f, "chunky version", &self.chunky_version)?;
        line(f, "chunky header len", &self.chunky_header_len)?;
        line(f, "local date", &self.local_date)?;
        line(f, "unknown date", &self.unknown_date)?;
        line(f, "mod name", &self.mod_name)?;
        line(f, "map name", &self.map_name)?;
        line(f, "map description", &self.map_description)?;
        line(f, "map file name", &self.map_file_name)?;
        line(f, "map width", &self.map_width)?;
        line(f, "map height", &self.map_height)?;

        let mut other: Vec<_> = self.other.iter().collect();
        other.sort();
        for (key, value) in other {
            writeln!(f, "{:<18}: {}", key, value)?;
        }
        Ok(())
    }
}
