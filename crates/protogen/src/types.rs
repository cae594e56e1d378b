//! # Primitive Types and Wire Methods
//!
//! The primitive type tags a schema may use, and the symbolic write methods
//! the wire runtime provides for them.
//!
//! A read method is always the write method with `write` replaced by
//! `read`, so only write names appear in a schema.

/// What kind of value a type or method carries. A field may only use a
/// method of its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Numeric,
    Text,
}

/// A primitive field type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Uint,
    Number,
    String,
    Boolean,
}

impl Primitive {
    /// Recognizes a schema type tag. Anything else names a custom type.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(Primitive::Int),
            "uint" => Some(Primitive::Uint),
            "Number" => Some(Primitive::Number),
            "String" => Some(Primitive::String),
            "Boolean" => Some(Primitive::Boolean),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Uint => "uint",
            Primitive::Number => "Number",
            Primitive::String => "String",
            Primitive::Boolean => "Boolean",
        }
    }

    /// The Rust type a field of this primitive is declared with.
    pub fn rust_type(self) -> &'static str {
        match self {
            Primitive::Int => "i32",
            Primitive::Uint => "u32",
            Primitive::Number => "f64",
            Primitive::String => "String",
            Primitive::Boolean => "bool",
        }
    }

    /// The default value expression, used by `Default` and `reset`.
    pub fn default_expr(self) -> &'static str {
        match self {
            Primitive::Int | Primitive::Uint => "0",
            Primitive::Number => "0.0",
            Primitive::String => "String::new()",
            Primitive::Boolean => "false",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Primitive::Int | Primitive::Uint | Primitive::Number => ValueKind::Numeric,
            Primitive::String => ValueKind::Text,
            Primitive::Boolean => ValueKind::Bool,
        }
    }
}

/// Defines every write method of the wire runtime.
/// Arguments per entry:
/// 1. Variant
/// 2. Schema name
/// 3. Writer function
/// 4. Reader function
/// 5. Native Rust type of the method
/// 6. Value kind
macro_rules! wire_methods {
    ($($variant:ident => $name:literal, $write:literal, $read:literal, $native:literal, $kind:ident;)*) => {
        /// A symbolic primitive write operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum WireMethod {
            $($variant,)*
        }

        impl WireMethod {
            pub const ALL: &'static [WireMethod] = &[$(WireMethod::$variant,)*];

            /// Recognizes a schema `writeMethod` name.
            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(WireMethod::$variant),)*
                    _ => None,
                }
            }

            /// The schema name, e.g. `writeVarInt`.
            pub fn name(self) -> &'static str {
                match self {
                    $(WireMethod::$variant => $name,)*
                }
            }

            /// The `protopack::Writer` method implementing it.
            pub fn writer_fn(self) -> &'static str {
                match self {
                    $(WireMethod::$variant => $write,)*
                }
            }

            /// The paired `protopack::Reader` method.
            pub fn reader_fn(self) -> &'static str {
                match self {
                    $(WireMethod::$variant => $read,)*
                }
            }

            /// The type the runtime method takes and returns.
            pub fn native_type(self) -> &'static str {
                match self {
                    $(WireMethod::$variant => $native,)*
                }
            }

            pub fn kind(self) -> ValueKind {
                match self {
                    $(WireMethod::$variant => ValueKind::$kind,)*
                }
            }
        }
    };
}

wire_methods! {
    Boolean     => "writeBoolean",     "write_boolean",      "read_boolean",      "bool",   Bool;
    Byte        => "writeByte",        "write_byte",         "read_byte",         "i8",     Numeric;
    Short       => "writeShort",       "write_short",        "read_short",        "i16",    Numeric;
    Int         => "writeInt",         "write_int",          "read_int",          "i32",    Numeric;
    UnsignedInt => "writeUnsignedInt", "write_unsigned_int", "read_unsigned_int", "u32",    Numeric;
    Float       => "writeFloat",       "write_float",        "read_float",        "f32",    Numeric;
    Double      => "writeDouble",      "write_double",       "read_double",       "f64",    Numeric;
    Utf         => "writeUTF",         "write_utf",          "read_utf",          "String", Text;
    VarInt      => "writeVarInt",      "write_var_int",      "read_var_int",      "i32",    Numeric;
    VarUhInt    => "writeVarUhInt",    "write_var_uh_int",   "read_var_uh_int",   "u32",    Numeric;
    VarShort    => "writeVarShort",    "write_var_short",    "read_var_short",    "i16",    Numeric;
    VarUhShort  => "writeVarUhShort",  "write_var_uh_short", "read_var_uh_short", "u16",    Numeric;
    VarLong     => "writeVarLong",     "write_var_long",     "read_var_long",     "i64",    Numeric;
    VarUhLong   => "writeVarUhLong",   "write_var_uh_long",  "read_var_uh_long",  "u64",    Numeric;
}

impl WireMethod {
    /// The schema name of the paired read method, e.g. `readVarInt`.
    pub fn read_name(self) -> String {
        self.name().replacen("write", "read", 1)
    }

    /// Whether a field of `primitive` may be carried by this method.
    pub fn accepts(self, primitive: Primitive) -> bool {
        self.kind() == primitive.kind()
    }

    /// The `as` target needed to pass a `primitive` value to this method,
    /// or `None` when the types already agree.
    pub fn cast_for(self, primitive: Primitive) -> Option<&'static str> {
        if self.native_type() == primitive.rust_type() {
            None
        } else {
            Some(self.native_type())
        }
    }
}
