use byteorder::{ByteOrder, LittleEndian};

use crate::error::ChunkyError;

/// Where to seek from. `End(n)` positions the cursor `n` bytes before the end
/// of the buffer (the replay format's third addressing mode), not a signed
/// offset as in `std::io::SeekFrom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    Start(usize),
    Current(i64),
    End(usize),
}

/// Bounds-checked sequential reader over an immutable byte buffer.
///
/// Every successful read advances the position by exactly the number of bytes
/// consumed. A read or seek that would leave `[0, len]` fails without moving
/// the position.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Cursor<'a> {
        Cursor { data, pos: 0 }
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn peek(&self, n: usize) -> Result<&'a [u8], ChunkyError> {
        if self.remaining() < n {
            return Err(ChunkyError::UnexpectedEof {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// Consume exactly `n` bytes, returning them as a subslice of the buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ChunkyError> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// Consume 4 bytes as a little-endian unsigned integer.
    pub fn read_u32(&mut self) -> Result<u32, ChunkyError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Consume `n` bytes decoded as 7-bit ASCII. Any byte outside the ASCII
    /// range fails with `InvalidEncoding` and leaves the position unchanged.
    pub fn read_ascii(&mut self, n: usize) -> Result<String, ChunkyError> {
        let offset = self.pos;
        let bytes = self.peek(n)?;
        if !bytes.is_ascii() {
            return Err(ChunkyError::InvalidEncoding {
                encoding: "ASCII",
                offset,
            });
        }
        self.pos += n;
        // ASCII is a subset of UTF-8, checked above
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Consume `char_count` UTF-16 code units (`char_count * 2` bytes),
    /// little-endian.
    pub fn read_utf16(&mut self, char_count: usize) -> Result<String, ChunkyError> {
        let offset = self.pos;
        let bytes = self.peek(char_count * 2)?;
        let mut units = vec![0u16; char_count];
        LittleEndian::read_u16_into(bytes, &mut units);
        let string = String::from_utf16(&units).map_err(|_| ChunkyError::InvalidEncoding {
            encoding: "UTF-16LE",
            offset,
        })?;
        self.pos += char_count * 2;
        Ok(string)
    }

    /// Consume a u32 length prefix counting UTF-16 code units (not bytes),
    /// then that many code units.
    pub fn read_length_utf16(&mut self) -> Result<String, ChunkyError> {
        let len = self.read_u32()? as usize;
        self.read_utf16(len)
    }

    /// Consume a u32 length prefix counting bytes, then that many ASCII bytes.
    pub fn read_length_ascii(&mut self) -> Result<String, ChunkyError> {
        let len = self.read_u32()? as usize;
        self.read_ascii(len)
    }

    /// Consume UTF-16LE code units up to and including the first `0x0000`.
    /// Unbounded: fails with `UnexpectedEof` if the buffer ends before a
    /// terminator is found.
    pub fn read_utf16_nul(&mut self) -> Result<String, ChunkyError> {
        let offset = self.pos;
        let mut units = Vec::new();
        loop {
            let unit = LittleEndian::read_u16(self.read_bytes(2)?);
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        String::from_utf16(&units).map_err(|_| ChunkyError::InvalidEncoding {
            encoding: "UTF-16LE",
            offset,
        })
    }

    /// Consume bytes up to and including the first `0x00`, decoded as ASCII.
    pub fn read_ascii_nul(&mut self) -> Result<String, ChunkyError> {
        let offset = self.pos;
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_bytes(1)?[0];
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        if !bytes.is_ascii() {
            return Err(ChunkyError::InvalidEncoding {
                encoding: "ASCII",
                offset,
            });
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reposition the cursor. A target outside `[0, len]` fails with
    /// `SeekOutOfBounds`; a successful seek never partially applies.
    pub fn seek(&mut self, from: SeekFrom) -> Result<usize, ChunkyError> {
        let len = self.data.len() as i64;
        let target = match from {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
            SeekFrom::End(n) => len - n as i64,
        };
        if target < 0 || target > len {
            return Err(ChunkyError::SeekOutOfBounds {
                target,
                len: self.data.len(),
            });
        }
        self.pos = target as usize;
        Ok(self.pos)
    }
}
