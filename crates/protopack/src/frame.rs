//! # Packet Frames
//!
//! Defines the envelope that `pack` wraps around a serialized message.
//!
//! ## Wire Format
//! - Header: u16 = `(message_id << 2) | len_type`
//! - Length: `len_type` bytes (0..=3), big-endian
//! - Payload: `length` bytes
//!
//! ## Invariants
//! - **Panic Safety**: Header decoding returns `Result`, never panicking on short input.
//! - Message ids occupy the upper 14 bits, so ids above `MAX_MESSAGE_ID` cannot be framed.

use crate::reader::Reader;
use crate::types::Error;
use crate::types::Result;
use crate::writer::Writer;

/// Largest message id representable in a packet header.
pub const MAX_MESSAGE_ID: u16 = 0x3FFF;

/// Largest payload representable with a 3-byte length.
pub const MAX_PAYLOAD_LEN: usize = 0xFF_FFFF;

/// A decoded packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub message_id: u16,
    pub length: usize,
}

/// Number of bytes needed to carry `len` in the header.
pub fn len_type(len: usize) -> u8 {
    if len > 0xFFFF {
        3
    } else if len > 0xFF {
        2
    } else if len > 0 {
        1
    } else {
        0
    }
}

/// Frames `payload` as message `message_id` onto `output`.
///
/// # Errors
/// Returns `Error::MessageIdOutOfRange` or `Error::PayloadTooLarge` if the
/// header cannot represent the packet.
pub fn write_packet(output: &mut Writer, message_id: u16, payload: &[u8]) -> Result<()> {
    if message_id > MAX_MESSAGE_ID {
        return Err(Error::MessageIdOutOfRange(message_id));
    }
    let len = payload.len();
    if len > MAX_PAYLOAD_LEN {
        return Err(Error::PayloadTooLarge(len));
    }

    let len_type = len_type(len);
    output.write_unsigned_short((message_id << 2) | u16::from(len_type))?;
    match len_type {
        0 => {}
        1 => { output.write_unsigned_byte(len as u8)?; }
        2 => { output.write_unsigned_short(len as u16)?; }
        _ => {
            output.write_unsigned_byte((len >> 16) as u8)?;
            output.write_unsigned_short((len & 0xFFFF) as u16)?;
        }
    }
    output.write_bytes(payload)?;
    Ok(())
}

/// Reads a packet header, leaving the reader at the start of the payload.
pub fn read_header(input: &mut Reader<'_>) -> Result<Header> {
    let raw = input.read_unsigned_short()?;
    let message_id = raw >> 2;
    let length = match raw & 0b11 {
        0 => 0,
        1 => input.read_unsigned_byte()? as usize,
        2 => input.read_unsigned_short()? as usize,
        _ => {
            let high = input.read_unsigned_byte()? as usize;
            let low = input.read_unsigned_short()? as usize;
            (high << 16) | low
        }
    };
    Ok(Header { message_id, length })
}
