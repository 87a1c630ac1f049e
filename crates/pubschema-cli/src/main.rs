//! # pubschema CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pubschema_cli::example::{run_example, ExampleArgs};
use pubschema_cli::list::{run_list, ListArgs};
use pubschema_cli::validate::{run_validate, ValidateArgs};

/// pubschema: example documents and validation for published content
/// schemas.
#[derive(Parser, Debug)]
#[command(name = "pubschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Root of the schema repository (the directory containing `dist/`).
    #[arg(long, global = true, env = "CONTENT_SCHEMA_DIR")]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a random document that validates against a schema.
    Example(ExampleArgs),

    /// Validate JSON or YAML documents against a schema.
    Validate(ValidateArgs),

    /// List the formats in the repository, or check every schema parses.
    List(ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let schema_dir = cli.schema_dir.as_deref();
    let result = match cli.command {
        Commands::Example(args) => run_example(&args, schema_dir),
        Commands::Validate(args) => run_validate(&args, schema_dir),
        Commands::List(args) => run_list(&args, schema_dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
