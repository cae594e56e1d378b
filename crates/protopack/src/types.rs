//! Core error types for the protopack wire format

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer exhausted while reading; carries the number of missing bytes.
    UnexpectedEnd(usize),
    /// String data is not valid UTF-8.
    InvalidUtf8,
    /// A variable-length integer ran past its bit width.
    VarIntTooLong(u32),
    /// String byte length does not fit the u16 length prefix.
    StringTooLong(usize),
    /// Sequence length does not fit the u16 count prefix.
    VectorTooLong(usize),
    /// Flag bit index outside of a single byte.
    FlagOverflow(u8),
    /// Message id does not fit the 14 bits of the packet header.
    MessageIdOutOfRange(u16),
    /// Packet payload does not fit the 24-bit length field.
    PayloadTooLarge(usize),
    /// No factory registered for a polymorphic type id read from the wire.
    UnknownTypeId(u16),
    /// Two factories registered under the same type id.
    DuplicateTypeId(u16),
    /// No factory registered for a message id read from the wire.
    UnknownMessageId(u16),
    /// Two factories registered under the same message id.
    DuplicateMessageId(u16),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnexpectedEnd(n) => write!(f, "unexpected end of buffer: {} more bytes needed", n),
            Error::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Error::VarIntTooLong(bits) => write!(f, "variable-length integer exceeds {} bits", bits),
            Error::StringTooLong(len) => write!(f, "string of {} bytes exceeds u16 length prefix", len),
            Error::VectorTooLong(len) => write!(f, "sequence of {} elements exceeds u16 count prefix", len),
            Error::FlagOverflow(bit) => write!(f, "flag bit {} does not fit in one byte", bit),
            Error::MessageIdOutOfRange(id) => write!(f, "message id {} exceeds {:#06x}", id, crate::frame::MAX_MESSAGE_ID),
            Error::PayloadTooLarge(len) => write!(f, "payload of {} bytes exceeds 24-bit length", len),
            Error::UnknownTypeId(id) => write!(f, "type with id {} is unknown", id),
            Error::DuplicateTypeId(id) => write!(f, "type id {} registered twice", id),
            Error::UnknownMessageId(id) => write!(f, "message with id {} is unknown", id),
            Error::DuplicateMessageId(id) => write!(f, "message id {} registered twice", id),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
