//! Traits implemented by generated messages and protocol types.

use std::any::Any;
use std::fmt::Debug;

use crate::frame;
use crate::reader::Reader;
use crate::registry::TypeRegistry;
use crate::types::Result;
use crate::writer::Writer;

/// The three codec operations every generated type provides.
///
/// A type composed over a parent runs the parent's operation first, then its
/// own flag fields, then its ordinary fields in declaration order.
pub trait Codec {
    /// Restores every field to its default value.
    fn reset(&mut self);

    /// Writes the fields in wire order.
    fn serialize(&self, writer: &mut Writer) -> Result<()>;

    /// Reads the fields in wire order.
    ///
    /// `types` resolves polymorphic fields from the type id that precedes them.
    fn deserialize(&mut self, reader: &mut Reader<'_>, types: &TypeRegistry) -> Result<()>;
}

/// A value type whose concrete type may be resolved from a wire type id.
pub trait ProtocolType: Codec + Debug + Send + Sync + 'static {
    /// The id written before this value when it travels polymorphically.
    fn protocol_type_id(&self) -> u16;

    fn as_any(&self) -> &dyn Any;
}

/// A top-level message addressed by its protocol id.
pub trait NetworkMessage: Codec + Debug + Send + Sync + 'static {
    fn message_id(&self) -> u16;

    fn as_any(&self) -> &dyn Any;

    /// Serializes the message and frames it with its id.
    fn pack(&self, output: &mut Writer) -> Result<()> {
        let mut payload = Writer::new();
        self.serialize(&mut payload)?;
        frame::write_packet(output, self.message_id(), payload.as_bytes())
    }

    /// Reads the message body; the header has already been consumed by the dispatcher.
    fn unpack(&mut self, input: &mut Reader<'_>, types: &TypeRegistry) -> Result<()> {
        self.deserialize(input, types)
    }
}

/// Builds a default instance of a protocol type.
pub type TypeFactory = fn() -> Box<dyn ProtocolType>;

/// Builds a default instance of a message.
pub type MessageFactory = fn() -> Box<dyn NetworkMessage>;

/// Factory for any default-constructible message, usable as a `MessageFactory`.
pub fn factory<M: NetworkMessage + Default>() -> Box<dyn NetworkMessage> {
    Box::new(M::default())
}

/// Factory for any default-constructible protocol type, usable as a `TypeFactory`.
pub fn type_factory<T: ProtocolType + Default>() -> Box<dyn ProtocolType> {
    Box::new(T::default())
}
