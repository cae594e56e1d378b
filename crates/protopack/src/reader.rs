//! Bounds-checked reader over a borrowed byte slice.

use crate::flag;
use crate::macros::for_each_fixed;
use crate::macros::for_each_var;
use crate::macros::read_fixed;
use crate::macros::read_var;
use crate::types::Error;
use crate::types::Result;

/// A cursor over a byte slice. Reading advances the position.
///
/// # Errors
/// All read operations return `Error::UnexpectedEnd` if the buffer is exhausted.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.slice.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if n > remaining {
            Err(Error::UnexpectedEnd(n - remaining))
        } else {
            Ok(())
        }
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let bytes = &self.slice[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    #[inline]
    pub fn read_unsigned_byte(&mut self) -> Result<u8> {
        self.need(1)?;
        let b = self.slice[self.pos];
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_unsigned_byte()? as i8)
    }

    #[inline]
    pub fn read_boolean(&mut self) -> Result<bool> {
        Ok(self.read_unsigned_byte()? != 0)
    }

    for_each_fixed!(read_fixed);

    for_each_var!(read_var);

    /// Reads a u16 byte length followed by that many UTF-8 bytes.
    pub fn read_utf(&mut self) -> Result<String> {
        let len = self.read_unsigned_short()? as usize;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8)
    }

    /// Reads the element count that precedes every sequence.
    pub fn read_count(&mut self) -> Result<usize> {
        Ok(self.read_unsigned_short()? as usize)
    }

    /// Reads one flag byte and extracts `bit`.
    pub fn read_flag(&mut self, bit: u8) -> Result<bool> {
        let byte = self.read_unsigned_byte()?;
        flag::get(byte, bit)
    }

    fn read_var_raw(&mut self, bits: u32) -> Result<u64> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_unsigned_byte()?;
            if shift >= bits {
                return Err(Error::VarIntTooLong(bits));
            }
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}
