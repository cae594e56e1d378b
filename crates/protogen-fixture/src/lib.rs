//! # Protogen Fixture
//!
//! A small protocol whose messages are generated from
//! `schema/protocol.json` by the build script and compiled in below.
//!
//! - `messages`: one module per message, nested by package
//! - `registry`: `MESSAGES` and `message_registry()`, the id dispatch table
//! - `index`: every message re-exported by name
//! - `types`: the hand-written protocol types the messages reference

pub mod types;

include!(concat!(env!("OUT_DIR"), "/protocol.rs"));
