//! `hashlit check`: rebuild every vector in a file and compare layouts.

use std::error::Error;

use hashlit_conformance::VectorFile;

use crate::pipeline::{load_settings, read_json};
use crate::{CheckArgs, GlobalArgs};

/// Outcome of checking one vector.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Pass,
    Mismatch(Vec<&'static str>),
    Error(String),
}

/// Runs the `hashlit check` command.
///
/// Returns exit code 0 if every vector rebuilds exactly, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_settings(global)?;
    let file: VectorFile = read_json(&args.vectors)?;
    let builder = config.index.builder();

    let mut failed = 0;
    for vector in &file.vectors {
        let outcome = match vector.check(&builder) {
            Ok(fields) if fields.is_empty() => Outcome::Pass,
            Ok(fields) => Outcome::Mismatch(fields),
            Err(e) => Outcome::Error(e.to_string()),
        };
        match &outcome {
            Outcome::Pass => {
                if !global.quiet {
                    println!("ok       {}", vector.name);
                }
            }
            Outcome::Mismatch(fields) => {
                tracing::warn!(name = %vector.name, ?fields, "layout mismatch");
                println!("MISMATCH {} ({})", vector.name, fields.join(", "));
            }
            Outcome::Error(message) => {
                println!("ERROR    {}: {message}", vector.name);
            }
        }
        if outcome != Outcome::Pass {
            failed += 1;
        }
    }

    if !global.quiet {
        eprintln!(
            "   {} passed, {failed} failed",
            file.vectors.len() - failed
        );
    }
    Ok(if failed == 0 { 0 } else { 1 })
}
