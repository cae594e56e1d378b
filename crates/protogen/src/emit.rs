//! # Codec Emitter
//!
//! Turns a planned layout into the three ordered instruction sequences of a
//! message: `reset`, `serialize` and `deserialize`.
//!
//! ## Ordering
//! Every sequence is `[parent] ++ flags ++ fields`: the parent's operation
//! first, then flag fields by position, then ordinary fields in authoring
//! order. A sequence with nothing to do is a single `Op::Nop`.

use tracing::trace;

use crate::layout::FieldPlan;
use crate::layout::InitExpr;
use crate::layout::Layout;
use crate::layout::Strategy;
use crate::layout::TypeRef;
use crate::schema::MessageType;
use crate::types::Primitive;
use crate::types::WireMethod;

/// One instruction of a codec body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Run the parent's version of the current operation.
    DelegateParent,
    ResetFlag { field: String },
    WriteFlag { field: String, bit: u8 },
    ReadFlag { field: String, bit: u8 },
    ResetField { field: String, init: InitExpr },
    WritePrimitive { field: String, method: WireMethod, primitive: Primitive },
    ReadPrimitive { field: String, method: WireMethod, primitive: Primitive },
    WriteObject { field: String },
    /// Replace with a default instance of `ty`, then deserialize into it.
    ReadObject { field: String, ty: TypeRef },
    /// Type id, then the payload.
    WriteTypedObject { field: String },
    /// Instance resolved from the type id on the wire, then the payload.
    ReadTypedObject { field: String },
    WritePrimitiveVec { field: String, method: WireMethod, primitive: Primitive },
    ReadPrimitiveVec { field: String, method: WireMethod, primitive: Primitive },
    WriteObjectVec { field: String, polymorphic: bool },
    ReadObjectVec { field: String, ty: TypeRef, polymorphic: bool },
    Nop,
}

impl Op {
    /// Whether the op reads from the type registry during `deserialize`.
    pub fn uses_types(&self) -> bool {
        matches!(
            self,
            Op::DelegateParent | Op::ReadObject { .. } | Op::ReadTypedObject { .. } | Op::ReadObjectVec { .. }
        )
    }
}

/// The codec of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecPlan {
    pub name: String,
    pub protocol_id: u16,
    pub parent: Option<String>,
    pub reset: Vec<Op>,
    pub serialize: Vec<Op>,
    pub deserialize: Vec<Op>,
}

/// Builds the codec plan of `message` from its layout.
pub fn emit(message: &MessageType, layout: &Layout) -> CodecPlan {
    let mut reset = Vec::new();
    let mut serialize = Vec::new();
    let mut deserialize = Vec::new();

    if layout.parent.is_some() {
        reset.push(Op::DelegateParent);
        serialize.push(Op::DelegateParent);
        deserialize.push(Op::DelegateParent);
    }

    for flag in &layout.flags {
        reset.push(Op::ResetFlag { field: flag.ident.clone() });
        serialize.push(Op::WriteFlag { field: flag.ident.clone(), bit: flag.bit });
        deserialize.push(Op::ReadFlag { field: flag.ident.clone(), bit: flag.bit });
    }

    for field in &layout.fields {
        reset.push(Op::ResetField { field: field.ident.clone(), init: field.init.clone() });
        let (write, read) = field_ops(field);
        serialize.push(write);
        deserialize.push(read);
    }

    for ops in [&mut reset, &mut serialize, &mut deserialize] {
        if ops.is_empty() {
            ops.push(Op::Nop);
        }
    }

    trace!(message = %message.name, ops = serialize.len(), "emitted codec");

    CodecPlan {
        name: message.name.clone(),
        protocol_id: message.protocol_id,
        parent: layout.parent.as_ref().map(|p| p.name.clone()),
        reset,
        serialize,
        deserialize,
    }
}

/// The serialize and deserialize instruction of an ordinary field.
fn field_ops(plan: &FieldPlan) -> (Op, Op) {
    let field = plan.ident.clone();
    match &plan.strategy {
        &Strategy::Primitive { method, primitive } => (
            Op::WritePrimitive { field: field.clone(), method, primitive },
            Op::ReadPrimitive { field, method, primitive },
        ),
        &Strategy::PrimitiveVector { method, primitive } => (
            Op::WritePrimitiveVec { field: field.clone(), method, primitive },
            Op::ReadPrimitiveVec { field, method, primitive },
        ),
        Strategy::Object(ty) => (
            Op::WriteObject { field: field.clone() },
            Op::ReadObject { field, ty: ty.clone() },
        ),
        Strategy::Polymorphic(_) => (
            Op::WriteTypedObject { field: field.clone() },
            Op::ReadTypedObject { field },
        ),
        Strategy::ObjectVector { ty, polymorphic } => (
            Op::WriteObjectVec { field: field.clone(), polymorphic: *polymorphic },
            Op::ReadObjectVec { field, ty: ty.clone(), polymorphic: *polymorphic },
        ),
    }
}
