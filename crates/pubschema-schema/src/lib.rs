//! # pubschema-schema: Schema Resolution & Validation
//!
//! ## Resolution (`resolve`)
//!
//! The [`resolve`] module maps a `(name, variant)` identifier to
//! `<base-dir>/dist/formats/<name>/<variant>/schema.json` and parses it.
//! Every call goes back to disk; there is no cache, so a missing or
//! malformed file is reported every time it is requested.
//!
//! - [`SchemaResolver::resolve`]: one schema by identifier.
//! - [`SchemaResolver::resolve_all`]: every `*.json` under `dist/`,
//!   all-or-nothing.
//! - [`SchemaResolver::resolve_each`]: every `*.json` under `dist/`,
//!   collecting per-file failures instead of aborting.
//!
//! ## Validation (`validate`)
//!
//! The [`validate`] module compiles a schema with the `jsonschema` crate
//! and reports every violation with its instance path, schema path and
//! message. Remote `$ref`s are refused: validation never touches the
//! network.
//!
//! ## Crate Policy
//!
//! - Depends only on `pubschema-core` internally.
//! - Schema files are read, never written.

pub mod resolve;
pub mod validate;

pub use resolve::{all, find, ResolveError, ResolveFailure, ResolveReport, SchemaResolver};
pub use validate::{
    load_document, SchemaValidationError, SchemaValidator, ValidationViolations, Violation,
};
