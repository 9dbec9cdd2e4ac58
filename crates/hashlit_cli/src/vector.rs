//! `hashlit vector`: record a test vector from a literal.

use std::error::Error;
use std::path::Path;

use hashlit_conformance::{TestVector, VectorFile};

use crate::pipeline::{load_settings, read_literal, to_json_bytes, write_output};
use crate::{GlobalArgs, VectorArgs};

/// Runs the `hashlit vector` command.
///
/// The output is a vector file holding one vector, so it can be passed
/// straight to `hashlit check`.
pub fn run(args: &VectorArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_settings(global)?;
    let literal = read_literal(&args.literal)?;
    let name = match &args.name {
        Some(name) => name.clone(),
        None => default_name(&args.literal),
    };

    let vector = TestVector::record(name, literal, &config.index.builder())?;
    tracing::debug!(
        name = %vector.name,
        table_size = vector.expected.probe_table.len(),
        "recorded vector"
    );

    let file = VectorFile {
        vectors: vec![vector],
    };
    write_output(args.output.as_deref(), &to_json_bytes(&file)?)?;
    Ok(0)
}

fn default_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vector".to_string())
}
