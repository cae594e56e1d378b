//! Generates the protocol modules from `schema/protocol.json`.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

use protogen::Config;
use protogen::Generator;
use protogen::ProtocolSchema;

const SCHEMA: &str = "schema/protocol.json";
const STRIP_PREFIX: &str = "com.ankamagames.dofus.network.";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed={}", SCHEMA);

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let path = manifest_dir.join(SCHEMA);
    let json = fs::read_to_string(&path).with_context(|| format!("read schema {}", path.display()))?;
    let schema = ProtocolSchema::from_json(&json).with_context(|| format!("parse schema {}", path.display()))?;

    let generator = Generator::new(Config::new().with_strip_prefix(STRIP_PREFIX));
    let output = generator.generate(&schema).context("generate protocol")?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join("protocol.rs");
    fs::write(&out, output.render_module_tree()).with_context(|| format!("write {}", out.display()))?;
    Ok(())
}
