//! # Validate Subcommand
//!
//! Validates JSON or YAML documents against a named schema from the
//! repository and prints one `PASS`/`FAIL` line per document, followed by
//! the violations of each failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pubschema_core::SchemaIdentifier;
use pubschema_schema::{load_document, SchemaValidator};

/// Arguments for the `pubschema validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Format name, e.g. `answer`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Schema variant (`frontend`, `publisher`, `links`, `notification`).
    #[arg(value_name = "VARIANT")]
    pub variant: String,

    /// Documents to validate (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if every document is valid, 1 otherwise. A
/// document that cannot be loaded counts as a failure.
pub fn run_validate(args: &ValidateArgs, schema_dir: Option<&Path>) -> Result<u8> {
    let id = SchemaIdentifier::new(&args.name, &args.variant)
        .with_context(|| format!("invalid schema identifier {}/{}", args.name, args.variant))?;
    let schema = crate::resolver(schema_dir)
        .resolve(&id)
        .with_context(|| format!("failed to resolve schema {id}"))?;
    let validator =
        SchemaValidator::new(&schema).with_context(|| format!("failed to compile schema {id}"))?;

    let mut failed = 0usize;
    for path in &args.paths {
        let violations = match load_document(path) {
            Ok(doc) => validator.validate(&doc),
            Err(e) => {
                println!("  FAIL: {}: {e}", path.display());
                failed += 1;
                continue;
            }
        };
        if violations.is_empty() {
            println!("  PASS: {}", path.display());
        } else {
            println!("  FAIL: {}", path.display());
            println!("{violations}");
            failed += 1;
        }
    }

    println!(
        "{id}: {}/{} passed",
        args.paths.len() - failed,
        args.paths.len()
    );
    Ok(u8::from(failed > 0))
}
