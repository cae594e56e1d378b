use crate::*;
use crate::emit::emit;
use crate::layout::plan;
use crate::layout::ImportKind;
use crate::layout::InitExpr;
use crate::layout::ResolvedType;
use crate::layout::TypeRef;
use crate::namespace::*;
use crate::render::render_message;

type R<T> = Result<T>;

const MESSAGES: &str = "com.ankamagames.messages.game";
const TYPES: &str = "com.ankamagames.types.game";

// ============================================================================
//  HELPERS
// ============================================================================

fn ty(name: &str) -> TypeRef {
    TypeRef { name: name.to_string(), package: TYPES.to_string() }
}

fn fixture(messages: Vec<MessageType>) -> ProtocolSchema {
    ProtocolSchema {
        messages,
        types: vec![
            CustomTypeDecl::new("Point", TYPES),
            CustomTypeDecl::new("Actor", TYPES),
        ],
    }
}

fn layout_of(schema: &ProtocolSchema, name: &str) -> R<Layout> {
    let message = schema.message(name).expect("message missing from fixture");
    plan(message, schema)
}

fn source_of(schema: &ProtocolSchema, name: &str) -> R<String> {
    let message = schema.message(name).expect("message missing from fixture");
    let layout = plan(message, schema)?;
    let codec = emit(message, &layout);
    Ok(render_message(&Config::new(), message, &layout, &codec))
}

/// Index of `needle` in `haystack`, failing the test when absent.
fn at(haystack: &str, needle: &str) -> usize {
    haystack.find(needle).unwrap_or_else(|| panic!("`{}` not found in:\n{}", needle, haystack))
}

// ============================================================================
//  SCHEMA
// ============================================================================

#[test]
fn test_schema_from_json() -> R<()> {
    let json = r#"{
        "messages": [
            { "name": "Base", "package": "com.ankamagames.m", "protocolId": 1, "parent": "", "fields": [] },
            {
                "name": "Child", "package": "com.ankamagames.m", "protocolId": 2, "parent": "Base",
                "fields": [
                    { "name": "ok", "type": "Boolean", "isVector": false, "useTypeManager": false, "useBBW": true, "bbwPosition": 3 },
                    { "name": "cellId", "type": "int", "writeMethod": "writeVarShort" }
                ]
            }
        ],
        "types": [{ "name": "Point", "package": "com.ankamagames.t" }]
    }"#;
    let schema = ProtocolSchema::from_json(json)?;

    assert_eq!(schema.messages.len(), 2);
    assert_eq!(schema.message("Base").and_then(|m| m.parent()), None);
    assert_eq!(schema.message("Child").and_then(|m| m.parent()), Some("Base"));

    let child = schema.message("Child").expect("Child");
    assert!(child.fields[0].use_bbw);
    assert_eq!(child.fields[0].bbw_position, Some(3));
    assert_eq!(child.fields[1].write_method.as_deref(), Some("writeVarShort"));
    assert!(!child.fields[1].is_vector);
    assert!(schema.custom_type("Point").is_some());
    assert!(schema.custom_type("Nope").is_none());
    Ok(())
}

#[test]
fn test_schema_rejects_bad_json() {
    let result = ProtocolSchema::from_json(r#"{ "messages": [{ "name": 3 }] }"#);
    assert!(matches!(result, Err(Error::Json(_))));
}

// ============================================================================
//  WIRE METHODS & NAMES
// ============================================================================

#[test]
fn test_wire_method_names() {
    assert_eq!(WireMethod::ALL.len(), 14);
    for method in WireMethod::ALL {
        assert_eq!(WireMethod::parse(method.name()), Some(*method));
        assert!(method.read_name().starts_with("read"));
    }
    assert_eq!(WireMethod::Utf.read_name(), "readUTF");
    assert_eq!(WireMethod::VarUhLong.reader_fn(), "read_var_uh_long");
    assert_eq!(WireMethod::parse("writeNothing"), None);
}

#[test]
fn test_wire_method_compatibility() {
    assert!(WireMethod::VarShort.accepts(Primitive::Int));
    assert!(WireMethod::Double.accepts(Primitive::Number));
    assert!(!WireMethod::Utf.accepts(Primitive::Int));
    assert!(!WireMethod::Boolean.accepts(Primitive::Uint));
    assert_eq!(WireMethod::Int.cast_for(Primitive::Int), None);
    assert_eq!(WireMethod::VarShort.cast_for(Primitive::Int), Some("i16"));
    assert_eq!(WireMethod::Utf.cast_for(Primitive::String), None);
}

#[test]
fn test_snake_case() {
    assert_eq!(snake_case("ChatServerMessage"), "chat_server_message");
    assert_eq!(snake_case("cellId"), "cell_id");
    assert_eq!(snake_case("NPCDialogMessage"), "npc_dialog_message");
    assert_eq!(snake_case("id2"), "id2");
    assert_eq!(snake_case("already_snake"), "already_snake");
}

#[test]
fn test_rust_ident() {
    assert_eq!(rust_ident("type"), "r#type");
    assert_eq!(rust_ident("gen"), "r#gen");
    assert_eq!(rust_ident("self"), "self_");
    assert_eq!(rust_ident("2d"), "_2d");
    assert_eq!(field_ident("senderName"), "sender_name");
}

#[test]
fn test_namespace_paths() {
    let config = Config::new();
    assert_eq!(clean_namespace("com.ankamagames.dofus.messages", &config.strip_prefix), vec!["dofus", "messages"]);
    assert_eq!(clean_namespace("other.pkg", &config.strip_prefix), vec!["other", "pkg"]);
    assert_eq!(
        message_type_path(&config, MESSAGES, "ChatMessage"),
        "crate::messages::game::chat_message::ChatMessage"
    );
    assert_eq!(custom_type_path(&config, TYPES, "Point"), "crate::types::game::Point");
    assert_eq!(file_path(&message_segments(&config, MESSAGES, "Ping")), "messages/game/ping.rs");

    let config = Config::new().with_messages_root("crate::proto").with_strip_prefix("com.");
    assert_eq!(message_module_path(&config, "com.a.b", "Ping"), "crate::proto::a::b::ping");
}

// ============================================================================
//  LAYOUT PLANNER
// ============================================================================

#[test]
fn test_flags_sorted_by_position_stable() -> R<()> {
    let schema = fixture(vec![MessageType::new("Flags", MESSAGES, 3)
        .with_field(FieldSpec::flag("c", 2))
        .with_field(FieldSpec::primitive("n", "int", "writeInt"))
        .with_field(FieldSpec::flag("a", 0))
        .with_field(FieldSpec::flag("tie", 2))
        .with_field(FieldSpec::flag("far", 9))]);
    let layout = layout_of(&schema, "Flags")?;

    let names: Vec<&str> = layout.flags.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "tie", "far"]);
    let bits: Vec<u8> = layout.flags.iter().map(|f| f.bit).collect();
    assert_eq!(bits, vec![0, 2, 2, 1]);
    assert_eq!(layout.fields.len(), 1);
    Ok(())
}

#[test]
fn test_classification_table() -> R<()> {
    let schema = fixture(vec![MessageType::new("All", MESSAGES, 4)
        .with_field(FieldSpec::primitive("count", "uint", "writeVarUhInt"))
        .with_field(FieldSpec::object("origin", "Point"))
        .with_field(FieldSpec::object("actor", "Actor").polymorphic())
        .with_field(FieldSpec::primitive("tags", "int", "writeInt").vector())
        .with_field(FieldSpec::object("path", "Point").vector())
        .with_field(FieldSpec::object("actors", "Actor").vector().polymorphic())]);
    let layout = layout_of(&schema, "All")?;
    let f = &layout.fields;

    assert_eq!(f[0].strategy, Strategy::Primitive { method: WireMethod::VarUhInt, primitive: Primitive::Uint });
    assert_eq!(f[0].init, InitExpr::Default(Primitive::Uint));
    assert!(!f[0].is_custom);

    assert_eq!(f[1].strategy, Strategy::Object(ty("Point")));
    assert_eq!(f[1].init, InitExpr::NewInstance(ty("Point")));
    assert!(f[1].is_custom);

    assert_eq!(f[2].strategy, Strategy::Polymorphic(ty("Actor")));
    assert_eq!(f[2].resolved, ResolvedType::Polymorphic(ty("Actor")));

    assert_eq!(f[3].strategy, Strategy::PrimitiveVector { method: WireMethod::Int, primitive: Primitive::Int });
    assert_eq!(f[3].init, InitExpr::EmptySequence);
    assert_eq!(f[3].resolved, ResolvedType::Sequence(Box::new(ResolvedType::Primitive(Primitive::Int))));

    assert_eq!(f[4].strategy, Strategy::ObjectVector { ty: ty("Point"), polymorphic: false });
    assert_eq!(f[4].init, InitExpr::EmptySequence);

    assert_eq!(f[5].strategy, Strategy::ObjectVector { ty: ty("Actor"), polymorphic: true });
    assert!(layout.has_polymorphic());
    Ok(())
}

#[test]
fn test_imports_parent_first_and_deduplicated() -> R<()> {
    let schema = fixture(vec![
        MessageType::new("Parent", MESSAGES, 1),
        MessageType::new("Child", MESSAGES, 2)
            .with_parent("Parent")
            .with_field(FieldSpec::object("a", "Point"))
            .with_field(FieldSpec::object("b", "Actor"))
            .with_field(FieldSpec::object("c", "Point").vector()),
        MessageType::new("Other", MESSAGES, 3).with_field(FieldSpec::object("p", "Point")),
    ]);

    let child = layout_of(&schema, "Child")?;
    let imports: Vec<(ImportKind, &str)> = child.imports.iter().map(|i| (i.kind, i.ty.name.as_str())).collect();
    assert_eq!(
        imports,
        vec![(ImportKind::Parent, "Parent"), (ImportKind::Custom, "Point"), (ImportKind::Custom, "Actor")]
    );

    // The dedup set is per message: Other still imports Point.
    let other = layout_of(&schema, "Other")?;
    assert_eq!(other.imports.len(), 1);
    assert_eq!(other.imports[0].ty.name, "Point");
    Ok(())
}

#[test]
fn test_unresolved_parent_is_fatal() {
    let schema = fixture(vec![MessageType::new("Orphan", MESSAGES, 1).with_parent("Missing")]);
    let err = layout_of(&schema, "Orphan").unwrap_err();
    assert!(matches!(err, Error::UnresolvedParent { ref parent, .. } if parent == "Missing"));
}

#[test]
fn test_unresolved_type_is_fatal() {
    let schema = fixture(vec![MessageType::new("M", MESSAGES, 1).with_field(FieldSpec::object("x", "Ghost"))]);
    let err = layout_of(&schema, "M").unwrap_err();
    assert!(matches!(err, Error::UnresolvedType { ref type_name, .. } if type_name == "Ghost"));
}

#[test]
fn test_inheritance_cycle_is_fatal() {
    let schema = fixture(vec![
        MessageType::new("A", MESSAGES, 1).with_parent("B"),
        MessageType::new("B", MESSAGES, 2).with_parent("A"),
        MessageType::new("Selfish", MESSAGES, 3).with_parent("Selfish"),
    ]);
    assert!(matches!(layout_of(&schema, "A"), Err(Error::InheritanceCycle(_))));
    assert!(matches!(layout_of(&schema, "Selfish"), Err(Error::InheritanceCycle(_))));
}

#[test]
fn test_write_method_errors() {
    let missing = FieldSpec { write_method: None, ..FieldSpec::primitive("n", "int", "") };
    let cases = [
        (missing, "missing"),
        (FieldSpec::primitive("n", "int", "writeWhatever"), "unknown"),
        (FieldSpec::primitive("n", "int", "writeUTF"), "incompatible"),
    ];
    for (field, case) in cases {
        let schema = fixture(vec![MessageType::new("M", MESSAGES, 1).with_field(field)]);
        let err = layout_of(&schema, "M").unwrap_err();
        let ok = match case {
            "missing" => matches!(err, Error::MissingWriteMethod { .. }),
            "unknown" => matches!(err, Error::UnknownWriteMethod { .. }),
            _ => matches!(err, Error::IncompatibleWriteMethod { .. }),
        };
        assert!(ok, "{}: got {:?}", case, err);
    }
}

#[test]
fn test_invalid_flags_and_polymorphic_primitives() {
    let not_bool = FieldSpec { type_name: "int".into(), ..FieldSpec::flag("f", 0) };
    let no_position = FieldSpec { bbw_position: None, ..FieldSpec::flag("f", 0) };
    for field in [not_bool, no_position] {
        let schema = fixture(vec![MessageType::new("M", MESSAGES, 1).with_field(field)]);
        assert!(matches!(layout_of(&schema, "M"), Err(Error::InvalidFlagField { .. })));
    }

    let poly = FieldSpec::primitive("n", "int", "writeInt").polymorphic();
    let schema = fixture(vec![MessageType::new("M", MESSAGES, 1).with_field(poly)]);
    assert!(matches!(layout_of(&schema, "M"), Err(Error::InvalidPolymorphicField { .. })));
}

#[test]
fn test_colliding_field_idents() {
    let schema = fixture(vec![
        MessageType::new("P", MESSAGES, 1),
        MessageType::new("Snake", MESSAGES, 2)
            .with_field(FieldSpec::primitive("cellId", "int", "writeInt"))
            .with_field(FieldSpec::primitive("cell_id", "int", "writeInt")),
        MessageType::new("Based", MESSAGES, 3)
            .with_parent("P")
            .with_field(FieldSpec::primitive("base", "int", "writeInt")),
    ]);
    assert!(matches!(layout_of(&schema, "Snake"), Err(Error::DuplicateField { .. })));
    assert!(matches!(layout_of(&schema, "Based"), Err(Error::DuplicateField { .. })));
}

#[test]
fn test_type_name_clashes_are_fatal() {
    let mut schema = fixture(vec![
        MessageType::new("Shadowed", MESSAGES, 1).with_field(FieldSpec::object("w", "Writer")),
        MessageType::new("Result", MESSAGES, 2),
        MessageType::new("Point", MESSAGES, 3).with_field(FieldSpec::object("p", "Point")),
        MessageType::new("Actor", MESSAGES, 4),
        MessageType::new("Child", MESSAGES, 5).with_parent("Actor").with_field(FieldSpec::object("a", "Actor")),
    ]);
    schema.types.push(CustomTypeDecl::new("Writer", TYPES));

    for (name, clash) in [("Shadowed", "Writer"), ("Result", "Result"), ("Point", "Point"), ("Child", "Actor")] {
        let err = layout_of(&schema, name).unwrap_err();
        assert!(
            matches!(err, Error::TypeNameClash { ref type_name, .. } if type_name == clash),
            "{}: got {:?}",
            name,
            err
        );
    }
    assert!(layout_of(&schema, "Actor").is_ok());
}

// ============================================================================
//  CODEC EMITTER
// ============================================================================

#[test]
fn test_empty_message_is_nop() -> R<()> {
    let schema = fixture(vec![MessageType::new("Ping", MESSAGES, 1)]);
    let message = &schema.messages[0];
    let codec = emit(message, &plan(message, &schema)?);

    assert_eq!(codec.protocol_id, 1);
    assert_eq!(codec.reset, vec![Op::Nop]);
    assert_eq!(codec.serialize, vec![Op::Nop]);
    assert_eq!(codec.deserialize, vec![Op::Nop]);
    Ok(())
}

#[test]
fn test_parent_then_flags_then_fields() -> R<()> {
    let schema = fixture(vec![
        MessageType::new("Base", MESSAGES, 1),
        MessageType::new("Derived", MESSAGES, 2)
            .with_parent("Base")
            .with_field(FieldSpec::primitive("n", "int", "writeInt"))
            .with_field(FieldSpec::flag("on", 1)),
    ]);
    let message = schema.message("Derived").expect("Derived");
    let codec = emit(message, &plan(message, &schema)?);

    assert_eq!(codec.parent.as_deref(), Some("Base"));
    for ops in [&codec.reset, &codec.serialize, &codec.deserialize] {
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], Op::DelegateParent);
    }
    assert_eq!(codec.serialize[1], Op::WriteFlag { field: "on".into(), bit: 1 });
    assert_eq!(codec.deserialize[1], Op::ReadFlag { field: "on".into(), bit: 1 });
    assert_eq!(codec.reset[1], Op::ResetFlag { field: "on".into() });
    assert_eq!(
        codec.serialize[2],
        Op::WritePrimitive { field: "n".into(), method: WireMethod::Int, primitive: Primitive::Int }
    );
    Ok(())
}

#[test]
fn test_object_ops() -> R<()> {
    let schema = fixture(vec![MessageType::new("M", MESSAGES, 1)
        .with_field(FieldSpec::object("origin", "Point"))
        .with_field(FieldSpec::object("actor", "Actor").polymorphic())
        .with_field(FieldSpec::object("actors", "Actor").polymorphic().vector())]);
    let message = &schema.messages[0];
    let codec = emit(message, &plan(message, &schema)?);

    assert_eq!(codec.deserialize[0], Op::ReadObject { field: "origin".into(), ty: ty("Point") });
    assert_eq!(codec.serialize[1], Op::WriteTypedObject { field: "actor".into() });
    assert_eq!(codec.deserialize[1], Op::ReadTypedObject { field: "actor".into() });
    assert_eq!(codec.serialize[2], Op::WriteObjectVec { field: "actors".into(), polymorphic: true });
    assert!(codec.deserialize.iter().all(Op::uses_types));
    Ok(())
}

// ============================================================================
//  RENDERER
// ============================================================================

#[test]
fn test_render_empty_message() -> R<()> {
    let schema = fixture(vec![MessageType::new("Ping", MESSAGES, 1)]);
    let src = source_of(&schema, "Ping")?;

    assert!(src.contains("pub struct Ping {}"));
    assert!(src.contains("pub const ID: u16 = 1;"));
    assert!(src.contains("fn reset(&mut self) {}"));
    assert!(src.contains("fn serialize(&self, _writer: &mut Writer) -> Result<()> {"));
    assert!(src.contains("fn deserialize(&mut self, _reader: &mut Reader<'_>, _types: &TypeRegistry) -> Result<()> {"));
    assert!(src.contains("Self::ID"));
    assert!(!src.contains("ProtocolType"));
    Ok(())
}

#[test]
fn test_render_parent_delegation_comes_first() -> R<()> {
    let schema = fixture(vec![
        MessageType::new("Base", MESSAGES, 1).with_field(FieldSpec::primitive("text", "String", "writeUTF")),
        MessageType::new("Derived", MESSAGES, 2)
            .with_parent("Base")
            .with_field(FieldSpec::primitive("cellId", "int", "writeVarShort"))
            .with_field(FieldSpec::flag("on", 0)),
    ]);
    let src = source_of(&schema, "Derived")?;

    assert!(src.contains("use crate::messages::game::base::Base;"));
    assert!(src.contains("pub base: Base,"));
    assert!(at(&src, "self.base.serialize(writer)?;") < at(&src, "writer.write_flag(0, self.on)?;"));
    assert!(at(&src, "writer.write_flag(0, self.on)?;") < at(&src, "writer.write_var_short(self.cell_id as i16)?;"));
    assert!(at(&src, "self.base.deserialize(reader, types)?;") < at(&src, "self.on = reader.read_flag(0)?;"));
    assert!(src.contains("self.cell_id = reader.read_var_short()? as i32;"));
    assert!(at(&src, "self.base.reset();") < at(&src, "self.on = false;"));

    let base = source_of(&schema, "Base")?;
    assert!(base.contains("writer.write_utf(&self.text)?;"));
    assert!(base.contains("_types: &TypeRegistry"));
    Ok(())
}

#[test]
fn test_render_vectors_and_polymorphism() -> R<()> {
    let schema = fixture(vec![MessageType::new("M", MESSAGES, 1)
        .with_field(FieldSpec::primitive("tags", "int", "writeInt").vector())
        .with_field(FieldSpec::primitive("names", "String", "writeUTF").vector())
        .with_field(FieldSpec::object("path", "Point").vector())
        .with_field(FieldSpec::object("actor", "Actor").polymorphic())
        .with_field(FieldSpec::object("actors", "Actor").polymorphic().vector())
        .with_field(FieldSpec::primitive("type", "int", "writeByte"))]);
    let src = source_of(&schema, "M")?;

    assert!(src.contains("use protopack::ProtocolType;"));
    assert!(src.contains("pub tags: Vec<i32>,"));
    assert!(src.contains("pub actor: Box<dyn ProtocolType>,"));
    assert!(src.contains("actor: Box::new(Actor::default()),"));
    assert!(src.contains("pub actors: Vec<Box<dyn ProtocolType>>,"));
    assert!(src.contains("writer.write_count(self.tags.len())?;"));
    assert!(src.contains("writer.write_int(*e)?;"));
    assert!(src.contains("writer.write_utf(e)?;"));
    assert!(src.contains("self.tags.push(reader.read_int()?);"));
    assert!(src.contains("let mut e = Point::default();"));
    assert!(src.contains("let mut e = types.read_instance(reader)?;"));
    assert!(src.contains("writer.write_unsigned_short(self.actor.protocol_type_id())?;"));
    assert!(src.contains("self.actor = types.read_instance(reader)?;"));
    assert!(src.contains("pub r#type: i32,"));
    assert!(src.contains("writer.write_byte(self.r#type as i8)?;"));

    // Plain object vectors carry no type id per element.
    let path_loop = &src[at(&src, "for e in &self.path {")..];
    let path_loop = &path_loop[..at(path_loop, "}")];
    assert!(!path_loop.contains("protocol_type_id"));

    // Point and Actor are imported once each.
    assert_eq!(src.matches("use crate::types::game::Point;").count(), 1);
    assert_eq!(src.matches("use crate::types::game::Actor;").count(), 1);
    Ok(())
}

// ============================================================================
//  REGISTRY EMITTER
// ============================================================================

#[test]
fn test_registry_one_entry_per_id() -> R<()> {
    let schema = fixture(vec![
        MessageType::new("Ping", MESSAGES, 1),
        MessageType::new("Pong", "com.ankamagames.messages.other", 2),
    ]);
    let registry = RegistryPlan::build(&schema, &Config::new())?;

    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.get(2).map(|e| e.path.as_str()),
        Some("crate::messages::other::pong::Pong")
    );
    assert!(registry.get(3).is_none());

    let src = registry.render_registry(&Config::new());
    assert!(src.contains("(1, protopack::factory::<crate::messages::game::ping::Ping>),"));
    assert!(src.contains("pub fn message_registry() -> Result<MessageRegistry> {"));

    let index = registry.render_index();
    assert!(index.contains("pub use crate::messages::game::ping::Ping;"));
    assert!(index.contains("pub use crate::messages::other::pong::Pong;"));
    Ok(())
}

#[test]
fn test_registry_duplicates() {
    let schema = fixture(vec![
        MessageType::new("First", MESSAGES, 5),
        MessageType::new("Second", MESSAGES, 5),
    ]);
    let err = RegistryPlan::build(&schema, &Config::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::DuplicateProtocolId { id: 5, ref first, ref second } if first == "First" && second == "Second"
    ));

    let schema = fixture(vec![
        MessageType::new("Same", MESSAGES, 1),
        MessageType::new("Same", MESSAGES, 2),
    ]);
    assert!(matches!(RegistryPlan::build(&schema, &Config::new()), Err(Error::DuplicateMessageName(_))));
}

#[test]
fn test_registry_empty() -> R<()> {
    let registry = RegistryPlan::build(&ProtocolSchema::default(), &Config::new())?;
    assert!(registry.is_empty());
    assert!(registry.render_registry(&Config::new()).contains("&[];"));
    Ok(())
}

#[test]
fn test_registry_rejects_shared_module_paths() {
    let package = "com.ankamagames.m";
    let schema = fixture(vec![
        MessageType::new("NPCMessage", package, 1),
        MessageType::new("NpcMessage", package, 2),
    ]);
    let err = RegistryPlan::build(&schema, &Config::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::DuplicateModulePath { ref path, ref first, ref second }
            if path == "crate::m::npc_message" && first == "NPCMessage" && second == "NpcMessage"
    ));
    assert!(matches!(Generator::default().generate(&schema), Err(Error::DuplicateModulePath { .. })));

    // The dispatch table and index modules are taken at the root.
    let schema = fixture(vec![MessageType::new("Index", "", 1)]);
    let err = RegistryPlan::build(&schema, &Config::new()).unwrap_err();
    assert!(matches!(err, Error::DuplicateModulePath { ref first, .. } if first == "index"));
}
