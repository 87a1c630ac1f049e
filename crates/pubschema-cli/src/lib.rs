//! # pubschema-cli: CLI Tool for pubschema
//!
//! Provides the `pubschema` command-line interface.
//!
//! ## Subcommands
//!
//! - `pubschema example`: Print a random, validated example document.
//! - `pubschema validate`: Validate a JSON or YAML document against a schema.
//! - `pubschema list`: List the formats in the repository, or check that
//!   every schema file parses.
//!
//! ```bash
//! pubschema example answer publisher --seed 7
//! pubschema example answer frontend --set base_path='"/vat-rates"'
//! pubschema validate answer frontend fixtures/answer.json
//! pubschema list --check
//! ```
//!
//! The schema repository is taken from `--schema-dir`, then
//! `CONTENT_SCHEMA_DIR`, then `../govuk-content-schemas`.

pub mod example;
pub mod list;
pub mod validate;

use std::path::Path;

use pubschema_core::ResolverConfig;
use pubschema_schema::SchemaResolver;

/// Resolver over `schema_dir` if given, otherwise over the environment.
pub fn resolver(schema_dir: Option<&Path>) -> SchemaResolver {
    let config = match schema_dir {
        Some(dir) => ResolverConfig::new(dir),
        None => ResolverConfig::from_env(),
    };
    tracing::debug!(base_dir = %config.base_dir().display(), "using schema repository");
    SchemaResolver::new(config)
}
