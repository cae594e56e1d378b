use std::any::Any;

use protopack::Codec;
use protopack::ProtocolType;
use protopack::Reader;
use protopack::Result;
use protopack::TypeRegistry;
use protopack::Writer;

/// A map cell coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const ID: u16 = 10;
}

impl Codec for Point {
    fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    fn serialize(&self, writer: &mut Writer) -> Result<()> {
        writer.write_short(self.x)?;
        writer.write_short(self.y)?;
        Ok(())
    }

    fn deserialize(&mut self, reader: &mut Reader<'_>, _types: &TypeRegistry) -> Result<()> {
        self.x = reader.read_short()?;
        self.y = reader.read_short()?;
        Ok(())
    }
}

impl ProtocolType for Point {
    fn protocol_type_id(&self) -> u16 {
        Self::ID
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Anything that stands on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorInformation {
    pub contextual_id: f64,
}

impl ActorInformation {
    pub const ID: u16 = 20;
}

impl Codec for ActorInformation {
    fn reset(&mut self) {
        self.contextual_id = 0.0;
    }

    fn serialize(&self, writer: &mut Writer) -> Result<()> {
        writer.write_double(self.contextual_id)?;
        Ok(())
    }

    fn deserialize(&mut self, reader: &mut Reader<'_>, _types: &TypeRegistry) -> Result<()> {
        self.contextual_id = reader.read_double()?;
        Ok(())
    }
}

impl ProtocolType for ActorInformation {
    fn protocol_type_id(&self) -> u16 {
        Self::ID
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterInformation {
    pub base: ActorInformation,
    pub name: String,
    pub level: u16,
}

impl CharacterInformation {
    pub const ID: u16 = 21;
}

impl Codec for CharacterInformation {
    fn reset(&mut self) {
        self.base.reset();
        self.name = String::new();
        self.level = 0;
    }

    fn serialize(&self, writer: &mut Writer) -> Result<()> {
        self.base.serialize(writer)?;
        writer.write_utf(&self.name)?;
        writer.write_var_uh_short(self.level)?;
        Ok(())
    }

    fn deserialize(&mut self, reader: &mut Reader<'_>, types: &TypeRegistry) -> Result<()> {
        self.base.deserialize(reader, types)?;
        self.name = reader.read_utf()?;
        self.level = reader.read_var_uh_short()?;
        Ok(())
    }
}

impl ProtocolType for CharacterInformation {
    fn protocol_type_id(&self) -> u16 {
        Self::ID
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonsterInformation {
    pub base: ActorInformation,
    pub creature_id: i32,
}

impl MonsterInformation {
    pub const ID: u16 = 22;
}

impl Codec for MonsterInformation {
    fn reset(&mut self) {
        self.base.reset();
        self.creature_id = 0;
    }

    fn serialize(&self, writer: &mut Writer) -> Result<()> {
        self.base.serialize(writer)?;
        writer.write_var_int(self.creature_id)?;
        Ok(())
    }

    fn deserialize(&mut self, reader: &mut Reader<'_>, types: &TypeRegistry) -> Result<()> {
        self.base.deserialize(reader, types)?;
        self.creature_id = reader.read_var_int()?;
        Ok(())
    }
}

impl ProtocolType for MonsterInformation {
    fn protocol_type_id(&self) -> u16 {
        Self::ID
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
