//! `hashlit build`: lay out a literal and write its constant image.

use std::error::Error;

use hashlit_cache::LiteralSymbol;
use hashlit_config::HashlitConfig;
use hashlit_conformance::{BuiltLiteral, Literal};

use crate::pipeline::{load_settings, read_literal, to_json_bytes, write_output};
use crate::{BuildArgs, GlobalArgs, OutputFormat};

/// Runs the `hashlit build` command.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_settings(global)?;
    let literal = read_literal(&args.literal)?;
    let (built, symbol) = lay_out(&literal, &config)?;

    tracing::info!(
        literal = %args.literal,
        %symbol,
        entries = built.entry_count(),
        table_size = built.table_size(),
        max_probe_distance = built.max_probe_distance(),
        "built index"
    );

    let layout = built.into_layout();
    let bytes = match args.format {
        OutputFormat::Json => to_json_bytes(&layout)?,
        OutputFormat::Bincode => bincode::serde::encode_to_vec(&layout, bincode::config::standard())?,
    };
    write_output(args.output.as_deref(), &bytes)?;

    if !global.quiet {
        eprintln!("   Symbol {symbol}");
        if let Some(path) = &args.output {
            eprintln!("   Wrote {} entries to {path}", layout.entry_count);
        }
    }
    Ok(0)
}

/// Builds the index and names it with the configured symbol prefixes.
fn lay_out(
    literal: &Literal,
    config: &HashlitConfig,
) -> Result<(BuiltLiteral, LiteralSymbol), Box<dyn Error>> {
    let symbol = literal.symbol(&config.symbols.prefixes())?;
    let built = literal.build(&config.index.builder())?;
    Ok((built, symbol))
}
