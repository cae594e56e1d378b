//! # Runtime Registries
//!
//! Lookup tables from wire ids to factories. Both are filled once at startup
//! and are read-only afterwards, so they can be shared across threads
//! without locking.
//!
//! - `TypeRegistry`: polymorphic type id -> protocol type factory
//! - `MessageRegistry`: message id -> message factory (the dispatch table)

use std::collections::BTreeMap;
use std::collections::HashMap;

use tracing::debug;
use tracing::trace;

use crate::frame;
use crate::reader::Reader;
use crate::traits::MessageFactory;
use crate::traits::NetworkMessage;
use crate::traits::ProtocolType;
use crate::traits::TypeFactory;
use crate::types::Error;
use crate::types::Result;

/// Maps polymorphic type ids to factories.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    factories: HashMap<u16, TypeFactory>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self { factories: HashMap::new() }
    }

    /// Registers a factory under `id`.
    ///
    /// # Errors
    /// Returns `Error::DuplicateTypeId` if `id` is already taken; the existing
    /// entry is left in place.
    pub fn register(&mut self, id: u16, factory: TypeFactory) -> Result<()> {
        if self.factories.contains_key(&id) {
            return Err(Error::DuplicateTypeId(id));
        }
        debug!(type_id = id, "registered protocol type");
        self.factories.insert(id, factory);
        Ok(())
    }

    /// Builds a default instance of the type registered under `id`.
    pub fn create(&self, id: u16) -> Result<Box<dyn ProtocolType>> {
        let factory = self.factories.get(&id).ok_or(Error::UnknownTypeId(id))?;
        Ok(factory())
    }

    /// Reads a leading u16 type id and builds the matching instance.
    ///
    /// The instance is not yet deserialized.
    pub fn read_instance(&self, reader: &mut Reader<'_>) -> Result<Box<dyn ProtocolType>> {
        let id = reader.read_unsigned_short()?;
        self.create(id)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.factories.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// The dispatch table from message id to message factory.
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    factories: BTreeMap<u16, MessageFactory>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self { factories: BTreeMap::new() }
    }

    /// Builds a registry from `(id, factory)` pairs.
    ///
    /// # Errors
    /// Returns `Error::DuplicateMessageId` on the first repeated id.
    pub fn from_entries(entries: &[(u16, MessageFactory)]) -> Result<Self> {
        let mut registry = Self::new();
        for (id, factory) in entries {
            registry.register(*id, *factory)?;
        }
        Ok(registry)
    }

    /// Registers a factory under `id`.
    ///
    /// # Errors
    /// Returns `Error::DuplicateMessageId` if `id` is already taken; the
    /// existing entry is left in place.
    pub fn register(&mut self, id: u16, factory: MessageFactory) -> Result<()> {
        if self.factories.contains_key(&id) {
            return Err(Error::DuplicateMessageId(id));
        }
        self.factories.insert(id, factory);
        Ok(())
    }

    /// Builds a default instance of the message registered under `id`.
    ///
    /// # Errors
    /// Returns `Error::UnknownMessageId` for ids absent from the table.
    pub fn create(&self, id: u16) -> Result<Box<dyn NetworkMessage>> {
        let factory = self.factories.get(&id).ok_or(Error::UnknownMessageId(id))?;
        Ok(factory())
    }

    /// Builds the message registered under `id` and unpacks it from `reader`.
    pub fn parse(&self, reader: &mut Reader<'_>, id: u16, types: &TypeRegistry) -> Result<Box<dyn NetworkMessage>> {
        trace!(message_id = id, "dispatching message");
        let mut message = self.create(id)?;
        message.unpack(reader, types)?;
        Ok(message)
    }

    /// Decodes one framed packet: header, then the message body.
    ///
    /// The body is read from a view bounded by the header length.
    pub fn decode(&self, packet: &[u8], types: &TypeRegistry) -> Result<Box<dyn NetworkMessage>> {
        let mut reader = Reader::new(packet);
        let header = frame::read_header(&mut reader)?;
        let payload = reader.read_bytes(header.length)?;
        let mut body = Reader::new(payload);
        self.parse(&mut body, header.message_id, types)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.factories.contains_key(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
