//! # Protogen
//!
//! Generates protopack message codecs from a declarative schema.
//!
//! ## Pipeline
//!
//! 1. **Schema Model** (`schema`): messages, custom types and fields, read from JSON.
//! 2. **Layout Planner** (`layout`): flag fields by position, ordinary fields in
//!    authoring order, each classified into one of five encodings.
//! 3. **Codec Emitter** (`emit`): the `reset`, `serialize` and `deserialize`
//!    instruction sequences, parent first.
//! 4. **Renderer** (`render`): the sequences printed as a Rust module.
//! 5. **Registry Emitter** (`registry`): the protocol id dispatch table and
//!    the flat message index.
//!
//! `Generator` drives all five. A run is a pure function of the schema and
//! the `Config`: either every artifact is produced or the first error is
//! returned.

pub mod error;
pub mod schema;
pub mod types;
pub mod config;
pub mod namespace;
pub mod layout;
pub mod emit;
pub mod render;
pub mod registry;
pub mod generate;

pub use error::Error;
pub use error::Result;

pub use schema::ProtocolSchema;
pub use schema::MessageType;
pub use schema::FieldSpec;
pub use schema::CustomTypeDecl;

pub use types::Primitive;
pub use types::WireMethod;

pub use config::Config;

pub use layout::Layout;
pub use layout::Strategy;

pub use emit::CodecPlan;
pub use emit::Op;

pub use registry::RegistryPlan;

pub use generate::Generator;
pub use generate::Output;
pub use generate::Artifact;

#[cfg(test)]
mod tests;
