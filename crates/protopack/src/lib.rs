//! # Protopack
//!
//! The runtime that generated protocol code links against.
//!
//! ## Format
//!
//! - **Scalars**: untagged, big-endian, fixed width (`byte`, `short`, `int`, `float`, `double`)
//! - **Var integers**: 7-bit groups, low group first, high bit = continuation
//! - **Strings**: `[Len: u16][UTF-8: Len]`
//! - **Sequences**: `[Count: u16][Element; Count]`
//! - **Flags**: one byte per flag field, bit N carries the value
//! - **Polymorphic values**: `[TypeId: u16][Payload]`
//! - **Packets**: `[Header: u16][Len: 0..=3 bytes][Payload]`, see [`frame`]
//!
//! The format is schema-driven: nothing on the wire says what comes next, so
//! reader and writer must run the same sequence of operations. `protogen`
//! derives that sequence per message type.

mod macros;

pub mod types;
pub mod writer;
pub mod reader;
pub mod flag;
pub mod frame;
pub mod traits;
pub mod registry;

pub use types::Result;
pub use types::Error;

pub use writer::Writer;
pub use reader::Reader;

pub use frame::Header;

pub use traits::Codec;
pub use traits::ProtocolType;
pub use traits::NetworkMessage;
pub use traits::MessageFactory;
pub use traits::TypeFactory;
pub use traits::factory;
pub use traits::type_factory;

pub use registry::TypeRegistry;
pub use registry::MessageRegistry;
