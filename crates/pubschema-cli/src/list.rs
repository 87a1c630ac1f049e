//! # List Subcommand
//!
//! Lists every `name/variant` pair in the repository. With `--check`,
//! parses every `*.json` file under `dist/` instead and reports the ones
//! that fail, without stopping at the first.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the `pubschema list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Parse every schema file and report failures.
    #[arg(long)]
    pub check: bool,
}

/// Execute the list subcommand.
///
/// Returns exit code: 0 on success, 1 if `--check` found files that do
/// not parse.
pub fn run_list(args: &ListArgs, schema_dir: Option<&Path>) -> Result<u8> {
    let resolver = crate::resolver(schema_dir);
    if args.check {
        return Ok(check(&resolver));
    }

    let formats = resolver
        .list_formats()
        .context("failed to list schema formats")?;
    for id in &formats {
        println!("{id}");
    }
    tracing::info!(count = formats.len(), "listed formats");
    Ok(0)
}

fn check(resolver: &pubschema_schema::SchemaResolver) -> u8 {
    let base = resolver.config().base_dir();
    let report = resolver.resolve_each();

    println!("Schemas: {}/{} parsed", report.schemas.len(), report.total());
    for failure in &report.failures {
        let rel = failure.path.strip_prefix(base).unwrap_or(&failure.path);
        println!("  FAIL: {}: {}", rel.display(), failure.error);
    }
    u8::from(!report.is_clean())
}
