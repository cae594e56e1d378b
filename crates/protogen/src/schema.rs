//! # Schema Model
//!
//! The generator's input: message types, the custom types their fields
//! reference, and the fields themselves. Pure data, read-only for the whole
//! run.
//!
//! The JSON shape is the one the schema extractor writes:
//!
//! ```json
//! {
//!   "messages": [{ "name": "Ping", "package": "com.x.messages", "protocolId": 1, "parent": "", "fields": [] }],
//!   "types": [{ "name": "Point", "package": "com.x.types" }]
//! }
//! ```

use serde::Deserialize;

use crate::error::Result;

/// The full input of one generation run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProtocolSchema {
    #[serde(default)]
    pub messages: Vec<MessageType>,
    #[serde(default)]
    pub types: Vec<CustomTypeDecl>,
}

/// One wire message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageType {
    pub name: String,
    #[serde(default)]
    pub package: String,
    pub protocol_id: u16,
    /// Absent or empty means the message derives from the root base.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One field of a message, in authoring order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_vector: bool,
    #[serde(default)]
    pub use_type_manager: bool,
    #[serde(default, rename = "useBBW")]
    pub use_bbw: bool,
    #[serde(default)]
    pub bbw_position: Option<u32>,
    #[serde(default)]
    pub write_method: Option<String>,
}

/// A non-primitive type that fields may reference by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTypeDecl {
    pub name: String,
    #[serde(default)]
    pub package: String,
}

impl ProtocolSchema {
    /// Parses a schema from the extractor's JSON output.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn message(&self, name: &str) -> Option<&MessageType> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn custom_type(&self, name: &str) -> Option<&CustomTypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

impl MessageType {
    /// Creates a message with no parent and no fields.
    pub fn new(name: impl Into<String>, package: impl Into<String>, protocol_id: u16) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            protocol_id,
            parent: None,
            fields: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// The parent name, treating an empty string as no parent.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }
}

impl FieldSpec {
    /// A scalar field written with `write_method`.
    pub fn primitive(name: impl Into<String>, type_name: impl Into<String>, write_method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_vector: false,
            use_type_manager: false,
            use_bbw: false,
            bbw_position: None,
            write_method: Some(write_method.into()),
        }
    }

    /// A scalar field of a custom type.
    pub fn object(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_vector: false,
            use_type_manager: false,
            use_bbw: false,
            bbw_position: None,
            write_method: None,
        }
    }

    /// A boolean packed as a flag at `position`.
    pub fn flag(name: impl Into<String>, position: u32) -> Self {
        Self {
            name: name.into(),
            type_name: "Boolean".to_string(),
            is_vector: false,
            use_type_manager: false,
            use_bbw: true,
            bbw_position: Some(position),
            write_method: None,
        }
    }

    pub fn vector(mut self) -> Self {
        self.is_vector = true;
        self
    }

    pub fn polymorphic(mut self) -> Self {
        self.use_type_manager = true;
        self
    }
}

impl CustomTypeDecl {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self { name: name.into(), package: package.into() }
    }
}
