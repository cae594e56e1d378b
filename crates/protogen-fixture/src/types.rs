//! Protocol types referenced by the generated messages.
//!
//! These are written by hand: the schema only names them, the generator
//! never emits them.

pub mod game;

use protopack::type_factory;
use protopack::Result;
use protopack::TypeRegistry;

/// Registers every polymorphic type under its protocol type id.
pub fn type_registry() -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry.register(game::Point::ID, type_factory::<game::Point>)?;
    registry.register(game::ActorInformation::ID, type_factory::<game::ActorInformation>)?;
    registry.register(game::CharacterInformation::ID, type_factory::<game::CharacterInformation>)?;
    registry.register(game::MonsterInformation::ID, type_factory::<game::MonsterInformation>)?;
    Ok(registry)
}
