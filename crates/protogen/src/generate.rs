//! # Generation Driver
//!
//! Runs the pipeline over a whole schema: registry checks first, then, per
//! message, layout planning, codec emission and rendering.
//!
//! ## Invariants
//! - **All or Nothing**: the first error aborts the run; no `Output` exists for a failed run.
//! - **Determinism**: the same schema and config always produce byte-identical output.

use std::collections::BTreeMap;

use tracing::debug;
use tracing::info;

use crate::config::Config;
use crate::emit;
use crate::error::Result;
use crate::layout;
use crate::namespace;
use crate::registry::RegistryPlan;
use crate::render;
use crate::render::Source;
use crate::schema::MessageType;
use crate::schema::ProtocolSchema;

/// Name of the dispatch table module.
pub const REGISTRY_MODULE: &str = "registry";

/// Name of the flat re-export module.
pub const INDEX_MODULE: &str = "index";

/// One generated Rust module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The message name, or the module name for the registry and index.
    pub name: String,
    /// File path relative to the output root, e.g. `messages/chat/chat_message.rs`.
    pub path: String,
    /// Absolute module path, e.g. `crate::messages::chat::chat_message`.
    pub module_path: String,
    /// Module segments relative to the messages root.
    pub segments: Vec<String>,
    /// Type re-exported from the enclosing module, if any.
    pub reexport: Option<String>,
    pub source: String,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub messages: Vec<Artifact>,
    pub registry: Artifact,
    pub index: Artifact,
}

/// The generator, parameterized by its `Config`.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates every artifact of `schema`.
    ///
    /// # Errors
    /// Duplicate ids and names are reported before any message is planned;
    /// after that, the first message that fails to plan aborts the run.
    pub fn generate(&self, schema: &ProtocolSchema) -> Result<Output> {
        info!(messages = schema.messages.len(), types = schema.types.len(), "generating protocol");

        let registry = RegistryPlan::build(schema, &self.config)?;

        let mut messages = Vec::with_capacity(schema.messages.len());
        for message in &schema.messages {
            messages.push(self.generate_message(message, schema)?);
        }

        let registry_artifact = self.module_artifact(REGISTRY_MODULE, registry.render_registry(&self.config));
        let index = self.module_artifact(INDEX_MODULE, registry.render_index());

        info!(artifacts = messages.len() + 2, "generated protocol");
        Ok(Output { messages, registry: registry_artifact, index })
    }

    /// Generates the artifact of a single message.
    pub fn generate_message(&self, message: &MessageType, schema: &ProtocolSchema) -> Result<Artifact> {
        let layout = layout::plan(message, schema)?;
        let codec = emit::emit(message, &layout);
        let source = render::render_message(&self.config, message, &layout, &codec);

        let segments = namespace::message_segments(&self.config, &message.package, &message.name);
        let artifact = Artifact {
            name: message.name.clone(),
            path: namespace::file_path(&segments),
            module_path: namespace::message_module_path(&self.config, &message.package, &message.name),
            segments,
            reexport: Some(message.name.clone()),
            source,
        };
        debug!(message = %message.name, path = %artifact.path, "rendered message");
        Ok(artifact)
    }

    fn module_artifact(&self, name: &str, source: String) -> Artifact {
        let segments = vec![name.to_string()];
        Artifact {
            name: name.to_string(),
            path: namespace::file_path(&segments),
            module_path: format!("{}::{}", self.config.messages_root, name),
            segments,
            reexport: None,
            source,
        }
    }
}

#[derive(Debug, Default)]
struct Node<'a> {
    artifact: Option<&'a Artifact>,
    exports: Vec<(&'a str, &'a str)>,
    children: BTreeMap<&'a str, Node<'a>>,
}

impl<'a> Node<'a> {
    fn insert(&mut self, artifact: &'a Artifact) {
        let mut node = self;
        let Some((leaf, parents)) = artifact.segments.split_last() else {
            return;
        };
        for segment in parents {
            node = node.children.entry(segment.as_str()).or_default();
        }
        if let Some(name) = &artifact.reexport {
            node.exports.push((leaf.as_str(), name.as_str()));
        }
        node.children.entry(leaf.as_str()).or_default().artifact = Some(artifact);
    }

    fn render(&self, src: &mut Source) {
        let mut first = true;
        let mut gap = |src: &mut Source| {
            if !first {
                src.blank();
            }
            first = false;
        };

        if let Some(artifact) = self.artifact {
            gap(src);
            src.block(&artifact.source);
        }
        if !self.exports.is_empty() {
            gap(src);
            for (module, name) in &self.exports {
                src.line(format!("pub use {}::{};", module, name));
            }
        }
        for (name, child) in &self.children {
            gap(src);
            src.open(format!("pub mod {} {{", name));
            child.render(src);
            src.close("}");
        }
    }
}

impl Output {
    /// All artifacts: messages in schema order, then the registry and the index.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.messages.iter().chain([&self.registry, &self.index])
    }

    pub fn message(&self, name: &str) -> Option<&Artifact> {
        self.messages.iter().find(|a| a.name == name)
    }

    /// Nests every artifact into one source string of `pub mod` blocks,
    /// suitable for `include!` at the messages root.
    pub fn render_module_tree(&self) -> String {
        let mut root = Node::default();
        for artifact in self.artifacts() {
            root.insert(artifact);
        }

        let mut src = Source::new();
        src.line("// Protocol modules: generated by protogen, do not edit.");
        src.blank();
        root.render(&mut src);
        src.finish()
    }
}
