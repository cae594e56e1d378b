//! # Rust Renderer
//!
//! Prints a message's layout and codec plan as a Rust module: the struct,
//! its `Default`, the `ID` constant and the `Codec`/`NetworkMessage` impls.
//!
//! Generated modules carry plain `//` comments only, so they can be nested
//! into one file and pulled in with `include!`.

use std::collections::HashSet;

use crate::config::Config;
use crate::emit::CodecPlan;
use crate::emit::Op;
use crate::layout::ImportKind;
use crate::layout::InitExpr;
use crate::layout::Layout;
use crate::layout::ResolvedType;
use crate::layout::Strategy;
use crate::layout::BASE_FIELD;
use crate::namespace;
use crate::schema::MessageType;
use crate::types::Primitive;
use crate::types::WireMethod;

const INDENT: &str = "    ";

/// A line-oriented source buffer that tracks indentation.
#[derive(Debug, Default)]
pub(crate) struct Source {
    out: String,
    depth: usize,
}

impl Source {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Writes `text` and indents what follows.
    pub(crate) fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedents and writes `text`.
    pub(crate) fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Copies a rendered block line by line at the current depth.
    pub(crate) fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Renders the module of one message.
pub fn render_message(config: &Config, message: &MessageType, layout: &Layout, codec: &CodecPlan) -> String {
    let mut src = Source::new();
    src.line(format!("// `{}`: generated by protogen, do not edit.", message.name));
    src.blank();
    render_imports(&mut src, config, layout);
    src.blank();
    render_struct(&mut src, message, layout);
    src.blank();
    render_default(&mut src, message, layout);
    src.blank();
    src.open(format!("impl {} {{", message.name));
    src.line(format!("pub const ID: u16 = {};", codec.protocol_id));
    src.close("}");
    src.blank();
    render_codec(&mut src, message, codec);
    src.blank();
    src.open(format!("impl NetworkMessage for {} {{", message.name));
    src.open("fn message_id(&self) -> u16 {");
    src.line("Self::ID");
    src.close("}");
    src.blank();
    src.open("fn as_any(&self) -> &dyn std::any::Any {");
    src.line("self");
    src.close("}");
    src.close("}");
    src.finish()
}

fn render_imports(src: &mut Source, config: &Config, layout: &Layout) {
    let mut runtime = vec!["Codec", "NetworkMessage", "Reader", "Result", "TypeRegistry", "Writer"];
    if layout.has_polymorphic() {
        runtime.push("ProtocolType");
    }
    runtime.sort_unstable();
    for name in &runtime {
        src.line(format!("use {}::{};", config.runtime_crate, name));
    }

    // Polymorphic vectors never name their declared type, so it is only
    // imported when some other field spells it out.
    let named: HashSet<&str> = layout
        .fields
        .iter()
        .filter_map(|f| match &f.strategy {
            Strategy::Object(ty) | Strategy::Polymorphic(ty) => Some(ty.name.as_str()),
            Strategy::ObjectVector { ty, polymorphic: false } => Some(ty.name.as_str()),
            _ => None,
        })
        .collect();

    let local: Vec<String> = layout
        .imports
        .iter()
        .filter(|i| i.kind == ImportKind::Parent || named.contains(i.ty.name.as_str()))
        .map(|i| match i.kind {
            ImportKind::Parent => namespace::message_type_path(config, &i.ty.package, &i.ty.name),
            ImportKind::Custom => namespace::custom_type_path(config, &i.ty.package, &i.ty.name),
        })
        .collect();
    if !local.is_empty() {
        src.blank();
        for path in local {
            src.line(format!("use {};", path));
        }
    }
}

fn render_struct(src: &mut Source, message: &MessageType, layout: &Layout) {
    if message.package.is_empty() {
        src.line(format!("/// Protocol message {}.", message.protocol_id));
    } else {
        src.line(format!("/// `{}.{}`, protocol message {}.", message.package, message.name, message.protocol_id));
    }
    src.line("#[derive(Debug)]");
    if layout.parent.is_none() && layout.flags.is_empty() && layout.fields.is_empty() {
        src.line(format!("pub struct {} {{}}", message.name));
        return;
    }
    src.open(format!("pub struct {} {{", message.name));
    if let Some(parent) = &layout.parent {
        src.line(format!("pub {}: {},", BASE_FIELD, parent.name));
    }
    for flag in &layout.flags {
        src.line(format!("pub {}: bool,", flag.ident));
    }
    for field in &layout.fields {
        src.line(format!("pub {}: {},", field.ident, rust_type(&field.resolved)));
    }
    src.close("}");
}

fn render_default(src: &mut Source, message: &MessageType, layout: &Layout) {
    src.open(format!("impl Default for {} {{", message.name));
    src.open("fn default() -> Self {");
    if layout.parent.is_none() && layout.flags.is_empty() && layout.fields.is_empty() {
        src.line("Self {}");
    } else {
        src.open("Self {");
        if let Some(parent) = &layout.parent {
            src.line(format!("{}: {}::default(),", BASE_FIELD, parent.name));
        }
        for flag in &layout.flags {
            src.line(format!("{}: false,", flag.ident));
        }
        for field in &layout.fields {
            src.line(format!("{}: {},", field.ident, init_expr(&field.init)));
        }
        src.close("}");
    }
    src.close("}");
    src.close("}");
}

fn render_codec(src: &mut Source, message: &MessageType, codec: &CodecPlan) {
    src.open(format!("impl Codec for {} {{", message.name));

    if is_nop(&codec.reset) {
        src.line("fn reset(&mut self) {}");
    } else {
        src.open("fn reset(&mut self) {");
        for op in &codec.reset {
            reset_op(src, op);
        }
        src.close("}");
    }
    src.blank();

    let writer = if is_nop(&codec.serialize) { "_writer" } else { "writer" };
    src.open(format!("fn serialize(&self, {}: &mut Writer) -> Result<()> {{", writer));
    for op in &codec.serialize {
        write_op(src, op);
    }
    src.line("Ok(())");
    src.close("}");
    src.blank();

    let reader = if is_nop(&codec.deserialize) { "_reader" } else { "reader" };
    let types = if codec.deserialize.iter().any(Op::uses_types) { "types" } else { "_types" };
    src.open(format!(
        "fn deserialize(&mut self, {}: &mut Reader<'_>, {}: &TypeRegistry) -> Result<()> {{",
        reader, types
    ));
    for op in &codec.deserialize {
        read_op(src, op);
    }
    src.line("Ok(())");
    src.close("}");

    src.close("}");
}

fn is_nop(ops: &[Op]) -> bool {
    ops.iter().all(|op| *op == Op::Nop)
}

fn reset_op(src: &mut Source, op: &Op) {
    match op {
        Op::DelegateParent => src.line(format!("self.{}.reset();", BASE_FIELD)),
        Op::ResetFlag { field } => src.line(format!("self.{} = false;", field)),
        Op::ResetField { field, init } => src.line(format!("self.{} = {};", field, init_expr(init))),
        _ => {}
    }
}

fn write_op(src: &mut Source, op: &Op) {
    match op {
        Op::DelegateParent => src.line(format!("self.{}.serialize(writer)?;", BASE_FIELD)),
        Op::WriteFlag { field, bit } => src.line(format!("writer.write_flag({}, self.{})?;", bit, field)),
        Op::WritePrimitive { field, method, primitive } => {
            let value = write_arg(&format!("self.{}", field), *method, *primitive, false);
            src.line(format!("writer.{}({})?;", method.writer_fn(), value));
        }
        Op::WriteObject { field } => src.line(format!("self.{}.serialize(writer)?;", field)),
        Op::WriteTypedObject { field } => {
            src.line(format!("writer.write_unsigned_short(self.{}.protocol_type_id())?;", field));
            src.line(format!("self.{}.serialize(writer)?;", field));
        }
        Op::WritePrimitiveVec { field, method, primitive } => {
            src.line(format!("writer.write_count(self.{}.len())?;", field));
            src.open(format!("for e in &self.{} {{", field));
            let value = write_arg("e", *method, *primitive, true);
            src.line(format!("writer.{}({})?;", method.writer_fn(), value));
            src.close("}");
        }
        Op::WriteObjectVec { field, polymorphic } => {
            src.line(format!("writer.write_count(self.{}.len())?;", field));
            src.open(format!("for e in &self.{} {{", field));
            if *polymorphic {
                src.line("writer.write_unsigned_short(e.protocol_type_id())?;");
            }
            src.line("e.serialize(writer)?;");
            src.close("}");
        }
        _ => {}
    }
}

fn read_op(src: &mut Source, op: &Op) {
    match op {
        Op::DelegateParent => src.line(format!("self.{}.deserialize(reader, types)?;", BASE_FIELD)),
        Op::ReadFlag { field, bit } => src.line(format!("self.{} = reader.read_flag({})?;", field, bit)),
        Op::ReadPrimitive { field, method, primitive } => {
            src.line(format!("self.{} = {};", field, read_expr(*method, *primitive)));
        }
        Op::ReadObject { field, ty } => {
            src.line(format!("self.{} = {}::default();", field, ty.name));
            src.line(format!("self.{}.deserialize(reader, types)?;", field));
        }
        Op::ReadTypedObject { field } => {
            src.line(format!("self.{} = types.read_instance(reader)?;", field));
            src.line(format!("self.{}.deserialize(reader, types)?;", field));
        }
        Op::ReadPrimitiveVec { field, method, primitive } => {
            src.open("for _ in 0..reader.read_count()? {");
            src.line(format!("self.{}.push({});", field, read_expr(*method, *primitive)));
            src.close("}");
        }
        Op::ReadObjectVec { field, ty, polymorphic } => {
            src.open("for _ in 0..reader.read_count()? {");
            if *polymorphic {
                src.line("let mut e = types.read_instance(reader)?;");
            } else {
                src.line(format!("let mut e = {}::default();", ty.name));
            }
            src.line("e.deserialize(reader, types)?;");
            src.line(format!("self.{}.push(e);", field));
            src.close("}");
        }
        _ => {}
    }
}

/// The argument passed to a writer method. `borrowed` marks a loop element,
/// which arrives as a reference.
fn write_arg(value: &str, method: WireMethod, primitive: Primitive, borrowed: bool) -> String {
    if primitive == Primitive::String {
        return if borrowed { value.to_string() } else { format!("&{}", value) };
    }
    let value = if borrowed { format!("*{}", value) } else { value.to_string() };
    match method.cast_for(primitive) {
        Some(native) => format!("{} as {}", value, native),
        None => value,
    }
}

fn read_expr(method: WireMethod, primitive: Primitive) -> String {
    let call = format!("reader.{}()?", method.reader_fn());
    match method.cast_for(primitive) {
        Some(_) => format!("{} as {}", call, primitive.rust_type()),
        None => call,
    }
}

/// The declared Rust type of a field.
pub fn rust_type(resolved: &ResolvedType) -> String {
    match resolved {
        ResolvedType::Primitive(p) => p.rust_type().to_string(),
        ResolvedType::Custom(ty) => ty.name.clone(),
        ResolvedType::Polymorphic(_) => "Box<dyn ProtocolType>".to_string(),
        ResolvedType::Sequence(inner) => format!("Vec<{}>", rust_type(inner)),
    }
}

/// The default value expression of a field.
pub fn init_expr(init: &InitExpr) -> String {
    match init {
        InitExpr::Default(p) => p.default_expr().to_string(),
        InitExpr::NewInstance(ty) => format!("{}::default()", ty.name),
        InitExpr::BoxedInstance(ty) => format!("Box::new({}::default())", ty.name),
        InitExpr::EmptySequence => "Vec::new()".to_string(),
    }
}
