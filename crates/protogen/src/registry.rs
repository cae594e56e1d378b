//! # Registry Emitter
//!
//! Builds the protocol-id dispatch table and the flat index of every
//! message, and checks that neither can be ambiguous.
//!
//! ## Invariants
//! - **Unique Ids**: one entry per protocol id; a repeat fails the run.
//! - **Unique Names**: one entry per message name; a repeat fails the run.
//! - **Unique Modules**: no two messages share a module, and none takes the
//!   `registry` or `index` module.
//! - Entries keep schema order.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::generate::INDEX_MODULE;
use crate::generate::REGISTRY_MODULE;
use crate::namespace;
use crate::render::Source;
use crate::schema::ProtocolSchema;

/// One row of the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub protocol_id: u16,
    pub name: String,
    /// Absolute Rust path of the message type.
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryPlan {
    pub entries: Vec<RegistryEntry>,
}

impl RegistryPlan {
    /// Collects every message of `schema`.
    ///
    /// # Errors
    /// `Error::DuplicateProtocolId`, `Error::DuplicateMessageName` or
    /// `Error::DuplicateModulePath` on the first repeat, in schema order.
    pub fn build(schema: &ProtocolSchema, config: &Config) -> Result<Self> {
        let mut ids: HashMap<u16, &str> = HashMap::new();
        let mut names = HashSet::new();
        let mut modules: HashMap<String, String> = HashMap::new();
        for module in [REGISTRY_MODULE, INDEX_MODULE] {
            modules.insert(namespace::message_module_path(config, "", module), module.to_string());
        }
        let mut entries = Vec::with_capacity(schema.messages.len());

        for message in &schema.messages {
            if let Some(first) = ids.insert(message.protocol_id, &message.name) {
                return Err(Error::DuplicateProtocolId {
                    id: message.protocol_id,
                    first: first.to_string(),
                    second: message.name.clone(),
                });
            }
            if !names.insert(message.name.as_str()) {
                return Err(Error::DuplicateMessageName(message.name.clone()));
            }
            let module = namespace::message_module_path(config, &message.package, &message.name);
            if let Some(first) = modules.insert(module.clone(), message.name.clone()) {
                return Err(Error::DuplicateModulePath { path: module, first, second: message.name.clone() });
            }
            entries.push(RegistryEntry {
                protocol_id: message.protocol_id,
                name: message.name.clone(),
                path: namespace::message_type_path(config, &message.package, &message.name),
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, protocol_id: u16) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.protocol_id == protocol_id)
    }

    /// Renders the `registry` module: the id to factory table and its constructor.
    pub fn render_registry(&self, config: &Config) -> String {
        let rt = &config.runtime_crate;
        let mut src = Source::new();
        src.line("// Message dispatch table: generated by protogen, do not edit.");
        src.blank();
        src.line(format!("use {}::MessageFactory;", rt));
        src.line(format!("use {}::MessageRegistry;", rt));
        src.line(format!("use {}::Result;", rt));
        src.blank();
        src.line("/// Every message of the protocol as `(protocol id, factory)`, in schema order.");
        if self.entries.is_empty() {
            src.line("pub const MESSAGES: &[(u16, MessageFactory)] = &[];");
        } else {
            src.open("pub const MESSAGES: &[(u16, MessageFactory)] = &[");
            for entry in &self.entries {
                src.line(format!("({}, {}::factory::<{}>),", entry.protocol_id, rt, entry.path));
            }
            src.close("];");
        }
        src.blank();
        src.line("/// Builds the runtime dispatch table from `MESSAGES`.");
        src.open("pub fn message_registry() -> Result<MessageRegistry> {");
        src.line("MessageRegistry::from_entries(MESSAGES)");
        src.close("}");
        src.finish()
    }

    /// Renders the `index` module: every message re-exported by its declared name.
    pub fn render_index(&self) -> String {
        let mut src = Source::new();
        src.line("// Message index: generated by protogen, do not edit.");
        if !self.entries.is_empty() {
            src.blank();
        }
        for entry in &self.entries {
            src.line(format!("pub use {};", entry.path));
        }
        src.finish()
    }
}
