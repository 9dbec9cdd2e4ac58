//! hashlit CLI: builds preloaded hash table literals and checks layout vectors.
//!
//! `hashlit build` lays out a literal read from JSON and writes its constant
//! image, `hashlit vector` records a test vector from a literal, and
//! `hashlit check` rebuilds every vector in a file and reports mismatches.

#![warn(missing_docs)]

mod build;
mod check;
mod pipeline;
mod vector;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

/// hashlit: build-time hash table literals.
#[derive(Parser, Debug)]
#[command(name = "hashlit", version, about = "Build-time hash table literals")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `hashlit.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the index for a literal and write its constant image.
    Build(BuildArgs),
    /// Record a test vector from a literal.
    Vector(VectorArgs),
    /// Rebuild every vector in a file and report mismatches.
    Check(CheckArgs),
}

/// Arguments for the `hashlit build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Literal JSON file.
    pub literal: String,

    /// Encoding of the written layout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output path (defaults to stdout).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `hashlit vector` subcommand.
#[derive(Parser, Debug)]
pub struct VectorArgs {
    /// Literal JSON file.
    pub literal: String,

    /// Vector name (defaults to the literal file stem).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output path (defaults to stdout).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `hashlit check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Vector JSON file.
    pub vectors: String,
}

/// Layout output encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// bincode with the standard configuration.
    Bincode,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(global.log_level())
        .with_writer(std::io::stderr)
        .try_init();

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Vector(ref args) => vector::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["hashlit", "build", "lit.json"]);
        match cli.command {
            Command::Build(ref args) => {
                assert_eq!(args.literal, "lit.json");
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.output.is_none());
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from([
            "hashlit",
            "build",
            "lit.json",
            "--format",
            "bincode",
            "--output",
            "lit.bin",
        ]);
        match cli.command {
            Command::Build(ref args) => {
                assert_eq!(args.format, OutputFormat::Bincode);
                assert_eq!(args.output.as_deref(), Some("lit.bin"));
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_vector_with_name() {
        let cli = Cli::parse_from(["hashlit", "vector", "lit.json", "--name", "small"]);
        match cli.command {
            Command::Vector(ref args) => {
                assert_eq!(args.literal, "lit.json");
                assert_eq!(args.name.as_deref(), Some("small"));
            }
            _ => panic!("expected Vector command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["hashlit", "check", "vectors.json"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.vectors, "vectors.json"),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["hashlit", "--quiet", "--config", "/tmp/hashlit.toml", "check", "v.json"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/tmp/hashlit.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["hashlit", "build", "lit.json", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn log_level_selection() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        assert_eq!(global.log_level(), Level::WARN);
        global.quiet = true;
        assert_eq!(global.log_level(), Level::ERROR);
        global.verbose = true;
        assert_eq!(global.log_level(), Level::DEBUG);
    }
}
