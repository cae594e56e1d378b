//! # Error Definitions
//!
//! Every way a generation run can fail. All of them are fatal: a run either
//! emits every artifact or none.

/// Failures raised while reading a schema or planning its messages.
#[derive(Debug)]
pub enum Error {
    /// The schema input is not valid JSON or does not match the schema shape.
    Json(serde_json::Error),
    /// A message names a parent that is not a message of the schema.
    UnresolvedParent { message: String, parent: String },
    /// A field names a type that is neither primitive nor a declared custom type.
    UnresolvedType { message: String, field: String, type_name: String },
    /// Two messages share a protocol id.
    DuplicateProtocolId { id: u16, first: String, second: String },
    /// Two messages share a name.
    DuplicateMessageName(String),
    /// Two messages, or a message and a generated module, map to one module path.
    DuplicateModulePath { path: String, first: String, second: String },
    /// Following `parent` links leads back to the starting message.
    InheritanceCycle(String),
    /// A primitive field has no `writeMethod`.
    MissingWriteMethod { message: String, field: String },
    /// A `writeMethod` that the wire runtime does not provide.
    UnknownWriteMethod { message: String, field: String, method: String },
    /// A `writeMethod` whose value kind does not match the field type.
    IncompatibleWriteMethod { message: String, field: String, method: String, type_name: String },
    /// A flag field that is not `Boolean` or lacks a `bbwPosition`.
    InvalidFlagField { message: String, field: String, reason: &'static str },
    /// A field marked polymorphic whose type is primitive.
    InvalidPolymorphicField { message: String, field: String, type_name: String },
    /// Two fields of one message map to the same Rust identifier.
    DuplicateField { message: String, field: String },
    /// A message or type name that would shadow, or be shadowed by, another
    /// name in the generated module.
    TypeNameClash { message: String, type_name: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Json(e) => write!(f, "invalid schema: {}", e),
            Error::UnresolvedParent { message, parent } => {
                write!(f, "{}: parent message `{}` not found", message, parent)
            }
            Error::UnresolvedType { message, field, type_name } => {
                write!(f, "{}.{}: type `{}` not found", message, field, type_name)
            }
            Error::DuplicateProtocolId { id, first, second } => {
                write!(f, "protocol id {} used by both {} and {}", id, first, second)
            }
            Error::DuplicateMessageName(name) => write!(f, "message `{}` declared twice", name),
            Error::DuplicateModulePath { path, first, second } => {
                write!(f, "module `{}` generated for both {} and {}", path, first, second)
            }
            Error::InheritanceCycle(name) => write!(f, "{}: parent chain is cyclic", name),
            Error::MissingWriteMethod { message, field } => {
                write!(f, "{}.{}: primitive field has no write method", message, field)
            }
            Error::UnknownWriteMethod { message, field, method } => {
                write!(f, "{}.{}: unknown write method `{}`", message, field, method)
            }
            Error::IncompatibleWriteMethod { message, field, method, type_name } => {
                write!(f, "{}.{}: `{}` cannot carry a `{}`", message, field, method, type_name)
            }
            Error::InvalidFlagField { message, field, reason } => {
                write!(f, "{}.{}: invalid flag field, {}", message, field, reason)
            }
            Error::InvalidPolymorphicField { message, field, type_name } => {
                write!(f, "{}.{}: primitive `{}` cannot be resolved by type id", message, field, type_name)
            }
            Error::DuplicateField { message, field } => {
                write!(f, "{}: field `{}` collides with another field", message, field)
            }
            Error::TypeNameClash { message, type_name } => {
                write!(f, "{}: type name `{}` clashes with a name already in scope", message, type_name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self { Self::Json(e) }
}

pub type Result<T> = std::result::Result<T, Error>;
