//! Big-endian writer for the protocol wire format.

use crate::flag;
use crate::macros::for_each_fixed;
use crate::macros::for_each_var;
use crate::macros::write_fixed;
use crate::macros::write_var;
use crate::types::Error;
use crate::types::Result;

/// A growable buffer that encodes values in wire order.
///
/// Nothing is tagged: the reader must issue the paired read for every write,
/// in the same order. Generated `serialize` bodies are the only intended
/// callers besides tests.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { buf: Vec::with_capacity(cap) }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn write_boolean(&mut self, v: bool) -> Result<&mut Self> {
        self.buf.push(v as u8);
        Ok(self)
    }

    #[inline]
    pub fn write_byte(&mut self, v: i8) -> Result<&mut Self> {
        self.buf.push(v as u8);
        Ok(self)
    }

    #[inline]
    pub fn write_unsigned_byte(&mut self, v: u8) -> Result<&mut Self> {
        self.buf.push(v);
        Ok(self)
    }

    for_each_fixed!(write_fixed);

    for_each_var!(write_var);

    /// Writes a u16 byte length followed by the UTF-8 bytes.
    pub fn write_utf(&mut self, v: &str) -> Result<&mut Self> {
        let len = v.len();
        if len > u16::MAX as usize {
            return Err(Error::StringTooLong(len));
        }
        self.write_unsigned_short(len as u16)?;
        self.buf.extend_from_slice(v.as_bytes());
        Ok(self)
    }

    /// Appends raw bytes with no length prefix.
    pub fn write_bytes(&mut self, v: &[u8]) -> Result<&mut Self> {
        self.buf.extend_from_slice(v);
        Ok(self)
    }

    /// Writes the element count that precedes every sequence.
    pub fn write_count(&mut self, len: usize) -> Result<&mut Self> {
        if len > u16::MAX as usize {
            return Err(Error::VectorTooLong(len));
        }
        self.write_unsigned_short(len as u16)
    }

    /// Writes one flag byte with `bit` set to `value` and every other bit clear.
    pub fn write_flag(&mut self, bit: u8, value: bool) -> Result<&mut Self> {
        let byte = flag::set(0, bit, value)?;
        self.write_unsigned_byte(byte)
    }

    fn write_var_raw(&mut self, mut v: u64) -> Result<&mut Self> {
        loop {
            let group = (v & 0x7F) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.push(group);
                return Ok(self);
            }
            self.buf.push(group | 0x80);
        }
    }
}
