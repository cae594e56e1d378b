//! # Layout Planner
//!
//! Decides, per message, which fields travel as flags, in which order, and
//! how every ordinary field is encoded.
//!
//! ## Invariants
//! - **Flag Order**: flag fields are ordered by `bbwPosition`, ties keep authoring order.
//! - **Field Order**: ordinary fields keep authoring order.
//! - **Fail Fast**: an unresolved parent or type aborts planning; no partial layout exists.
//! - **Local Dedup**: the import set lives only for one `plan` call.

use std::collections::HashSet;

use tracing::debug;

use crate::error::Error;
use crate::error::Result;
use crate::namespace;
use crate::schema::FieldSpec;
use crate::schema::MessageType;
use crate::schema::ProtocolSchema;
use crate::types::Primitive;
use crate::types::WireMethod;

/// Name of the struct field that holds the parent message.
pub const BASE_FIELD: &str = "base";

/// Names every generated module uses unqualified: the runtime imports and
/// the prelude items the rendered bodies spell out.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Codec", "NetworkMessage", "ProtocolType", "Reader", "Result", "TypeRegistry", "Writer",
    "Box", "Default", "Ok", "Self", "String", "Vec",
];

/// A named, namespaced type: a custom type or a parent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub package: String,
}

/// Where an import points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Parent,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    pub ty: TypeRef,
}

/// The concrete type a field is declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Primitive(Primitive),
    Custom(TypeRef),
    /// Any protocol type; the concrete type comes from the wire.
    Polymorphic(TypeRef),
    Sequence(Box<ResolvedType>),
}

/// How a field starts out and how `reset` restores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitExpr {
    Default(Primitive),
    NewInstance(TypeRef),
    BoxedInstance(TypeRef),
    EmptySequence,
}

/// The five encodings of an ordinary field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Primitive { method: WireMethod, primitive: Primitive },
    Object(TypeRef),
    Polymorphic(TypeRef),
    PrimitiveVector { method: WireMethod, primitive: Primitive },
    ObjectVector { ty: TypeRef, polymorphic: bool },
}

/// A boolean field carried as a flag byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagPlan {
    pub name: String,
    pub ident: String,
    pub position: u32,
    pub bit: u8,
}

/// An ordinary field with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    pub ident: String,
    pub resolved: ResolvedType,
    pub is_custom: bool,
    pub init: InitExpr,
    pub strategy: Strategy,
}

/// The planned shape of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub parent: Option<TypeRef>,
    pub flags: Vec<FlagPlan>,
    pub fields: Vec<FieldPlan>,
    pub imports: Vec<Import>,
}

impl Layout {
    /// Whether any field holds a polymorphic value.
    pub fn has_polymorphic(&self) -> bool {
        self.fields.iter().any(|f| {
            matches!(f.strategy, Strategy::Polymorphic(_) | Strategy::ObjectVector { polymorphic: true, .. })
        })
    }
}

impl FieldPlan {
    /// The custom type of an object field or object vector.
    pub fn custom_type(&self) -> Option<&TypeRef> {
        match &self.strategy {
            Strategy::Object(ty) | Strategy::Polymorphic(ty) | Strategy::ObjectVector { ty, .. } => Some(ty),
            Strategy::Primitive { .. } | Strategy::PrimitiveVector { .. } => None,
        }
    }
}

/// Plans the layout of `message` against `schema`.
///
/// # Errors
/// Fails on an unresolved parent or type, a cyclic parent chain, a malformed
/// flag field, a missing, unknown or mismatched write method, fields that
/// collide once mapped to Rust identifiers, and type names that clash in the
/// generated module.
pub fn plan(message: &MessageType, schema: &ProtocolSchema) -> Result<Layout> {
    if RESERVED_TYPE_NAMES.contains(&message.name.as_str()) {
        return Err(Error::TypeNameClash { message: message.name.clone(), type_name: message.name.clone() });
    }
    let parent = resolve_parent(message, schema)?;

    let mut idents = HashSet::new();
    if parent.is_some() {
        idents.insert(BASE_FIELD.to_string());
    }

    let mut imports = Vec::new();
    if let Some(p) = &parent {
        imports.push(Import { kind: ImportKind::Parent, ty: p.clone() });
    }

    let (flag_specs, other_specs): (Vec<&FieldSpec>, Vec<&FieldSpec>) =
        message.fields.iter().partition(|f| f.use_bbw);

    let mut flags = Vec::with_capacity(flag_specs.len());
    for field in flag_specs {
        let flag = plan_flag(message, field)?;
        claim(message, &mut idents, &flag.ident)?;
        flags.push(flag);
    }
    flags.sort_by_key(|f| f.position);

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(other_specs.len());
    for field in other_specs {
        let planned = plan_field(message, field, schema)?;
        claim(message, &mut idents, &planned.ident)?;
        if let Some(ty) = planned.custom_type() {
            if seen.insert(ty.name.clone()) {
                imports.push(Import { kind: ImportKind::Custom, ty: ty.clone() });
            }
        }
        fields.push(planned);
    }

    let mut imported = HashSet::new();
    for import in &imports {
        let name = import.ty.name.as_str();
        if name == message.name || RESERVED_TYPE_NAMES.contains(&name) || !imported.insert(name) {
            return Err(Error::TypeNameClash { message: message.name.clone(), type_name: name.to_string() });
        }
    }

    debug!(
        message = %message.name,
        flags = flags.len(),
        fields = fields.len(),
        imports = imports.len(),
        "planned layout"
    );

    Ok(Layout { parent, flags, fields, imports })
}

/// Resolves the direct parent and checks that the whole chain terminates.
fn resolve_parent(message: &MessageType, schema: &ProtocolSchema) -> Result<Option<TypeRef>> {
    let Some(parent_name) = message.parent() else {
        return Ok(None);
    };

    let mut visited = HashSet::new();
    visited.insert(message.name.as_str());

    let mut current = message;
    while let Some(name) = current.parent() {
        let next = schema.message(name).ok_or_else(|| Error::UnresolvedParent {
            message: current.name.clone(),
            parent: name.to_string(),
        })?;
        if !visited.insert(next.name.as_str()) {
            return Err(Error::InheritanceCycle(message.name.clone()));
        }
        current = next;
    }

    let parent = schema.message(parent_name).ok_or_else(|| Error::UnresolvedParent {
        message: message.name.clone(),
        parent: parent_name.to_string(),
    })?;
    Ok(Some(TypeRef { name: parent.name.clone(), package: parent.package.clone() }))
}

fn plan_flag(message: &MessageType, field: &FieldSpec) -> Result<FlagPlan> {
    let invalid = |reason| Error::InvalidFlagField {
        message: message.name.clone(),
        field: field.name.clone(),
        reason,
    };

    if Primitive::parse(&field.type_name) != Some(Primitive::Boolean) {
        return Err(invalid("type is not Boolean"));
    }
    if field.is_vector {
        return Err(invalid("flags cannot be vectors"));
    }
    let position = field.bbw_position.ok_or_else(|| invalid("no bbwPosition"))?;

    Ok(FlagPlan {
        name: field.name.clone(),
        ident: namespace::field_ident(&field.name),
        position,
        bit: (position % 8) as u8,
    })
}

fn plan_field(message: &MessageType, field: &FieldSpec, schema: &ProtocolSchema) -> Result<FieldPlan> {
    let ident = namespace::field_ident(&field.name);

    if let Some(primitive) = Primitive::parse(&field.type_name) {
        if field.use_type_manager {
            return Err(Error::InvalidPolymorphicField {
                message: message.name.clone(),
                field: field.name.clone(),
                type_name: field.type_name.clone(),
            });
        }
        let method = write_method(message, field, primitive)?;
        let element = ResolvedType::Primitive(primitive);
        let (resolved, init, strategy) = if field.is_vector {
            (
                ResolvedType::Sequence(Box::new(element)),
                InitExpr::EmptySequence,
                Strategy::PrimitiveVector { method, primitive },
            )
        } else {
            (element, InitExpr::Default(primitive), Strategy::Primitive { method, primitive })
        };
        return Ok(FieldPlan { name: field.name.clone(), ident, resolved, is_custom: false, init, strategy });
    }

    let decl = schema.custom_type(&field.type_name).ok_or_else(|| Error::UnresolvedType {
        message: message.name.clone(),
        field: field.name.clone(),
        type_name: field.type_name.clone(),
    })?;
    let ty = TypeRef { name: decl.name.clone(), package: decl.package.clone() };

    let polymorphic = field.use_type_manager;
    let element = if polymorphic {
        ResolvedType::Polymorphic(ty.clone())
    } else {
        ResolvedType::Custom(ty.clone())
    };

    let (resolved, init, strategy) = match (field.is_vector, polymorphic) {
        (true, _) => (
            ResolvedType::Sequence(Box::new(element)),
            InitExpr::EmptySequence,
            Strategy::ObjectVector { ty, polymorphic },
        ),
        (false, true) => (element, InitExpr::BoxedInstance(ty.clone()), Strategy::Polymorphic(ty)),
        (false, false) => (element, InitExpr::NewInstance(ty.clone()), Strategy::Object(ty)),
    };

    Ok(FieldPlan { name: field.name.clone(), ident, resolved, is_custom: true, init, strategy })
}

fn write_method(message: &MessageType, field: &FieldSpec, primitive: Primitive) -> Result<WireMethod> {
    let name = field.write_method.as_deref().ok_or_else(|| Error::MissingWriteMethod {
        message: message.name.clone(),
        field: field.name.clone(),
    })?;
    let method = WireMethod::parse(name).ok_or_else(|| Error::UnknownWriteMethod {
        message: message.name.clone(),
        field: field.name.clone(),
        method: name.to_string(),
    })?;
    if !method.accepts(primitive) {
        return Err(Error::IncompatibleWriteMethod {
            message: message.name.clone(),
            field: field.name.clone(),
            method: name.to_string(),
            type_name: primitive.tag().to_string(),
        });
    }
    Ok(method)
}

fn claim(message: &MessageType, idents: &mut HashSet<String>, ident: &str) -> Result<()> {
    if idents.insert(ident.to_string()) {
        Ok(())
    } else {
        Err(Error::DuplicateField { message: message.name.clone(), field: ident.to_string() })
    }
}
