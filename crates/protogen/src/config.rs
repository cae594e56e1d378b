//! Generation settings.

/// Where generated code lives and what it links against.
///
/// Packages are mapped to module paths by stripping `strip_prefix` and
/// splitting on `.`; message modules hang off `messages_root`, custom types
/// are referenced under `types_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub strip_prefix: String,
    pub messages_root: String,
    pub types_root: String,
    pub runtime_crate: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip_prefix: "com.ankamagames.".to_string(),
            messages_root: "crate".to_string(),
            types_root: "crate".to_string(),
            runtime_crate: "protopack".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = prefix.into();
        self
    }

    pub fn with_messages_root(mut self, root: impl Into<String>) -> Self {
        self.messages_root = root.into();
        self
    }

    pub fn with_types_root(mut self, root: impl Into<String>) -> Self {
        self.types_root = root.into();
        self
    }

    pub fn with_runtime_crate(mut self, name: impl Into<String>) -> Self {
        self.runtime_crate = name.into();
        self
    }
}
