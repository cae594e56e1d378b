//! # Namespace Mapping
//!
//! Turns dotted schema packages and schema names into Rust module paths,
//! file paths and identifiers.
//!
//! ## Invariants
//! - Mapping is deterministic: the same package and name always yield the same path.
//! - Every produced identifier is a valid Rust identifier (keywords become raw identifiers).

use crate::config::Config;

/// Words that need `r#` to be used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "Self", "super"];

/// Strips `prefix` from `package` and splits the rest into module names.
///
/// A package that does not start with `prefix` is used whole.
pub fn clean_namespace(package: &str, prefix: &str) -> Vec<String> {
    let rest = package.strip_prefix(prefix).unwrap_or(package);
    rest.split('.')
        .filter(|s| !s.is_empty())
        .map(module_ident)
        .collect()
}

/// Converts a camelCase or PascalCase name to snake_case.
///
/// Acronyms stay together: `NPCDialog` becomes `npc_dialog`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Makes `name` usable as an identifier.
pub fn rust_ident(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    if RESERVED.contains(&name) {
        return format!("{}_", name);
    }
    if KEYWORDS.contains(&name) {
        return format!("r#{}", name);
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", name);
    }
    name.to_string()
}

/// The struct field identifier for a schema field name.
pub fn field_ident(name: &str) -> String {
    rust_ident(&snake_case(name))
}

/// The module identifier for a package segment or message name.
pub fn module_ident(name: &str) -> String {
    rust_ident(&snake_case(name))
}

/// Module segments of a message artifact, relative to `messages_root`.
///
/// The last segment is the message's own module.
pub fn message_segments(config: &Config, package: &str, name: &str) -> Vec<String> {
    let mut segments = clean_namespace(package, &config.strip_prefix);
    segments.push(module_ident(name));
    segments
}

/// Absolute module path of a message artifact.
pub fn message_module_path(config: &Config, package: &str, name: &str) -> String {
    join(&config.messages_root, &message_segments(config, package, name))
}

/// Absolute path of a message type, used by imports, the registry and the index.
pub fn message_type_path(config: &Config, package: &str, name: &str) -> String {
    format!("{}::{}", message_module_path(config, package, name), name)
}

/// Absolute path of a custom type.
pub fn custom_type_path(config: &Config, package: &str, name: &str) -> String {
    let segments = clean_namespace(package, &config.strip_prefix);
    format!("{}::{}", join(&config.types_root, &segments), name)
}

/// Relative file path of an artifact: `segments/.../last.rs`.
pub fn file_path(segments: &[String]) -> String {
    let parts: Vec<&str> = segments.iter().map(|s| s.trim_start_matches("r#")).collect();
    format!("{}.rs", parts.join("/"))
}

fn join(root: &str, segments: &[String]) -> String {
    let mut path = root.to_string();
    for segment in segments {
        if !path.is_empty() {
            path.push_str("::");
        }
        path.push_str(segment);
    }
    path
}
