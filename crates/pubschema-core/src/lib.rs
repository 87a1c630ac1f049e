//! # pubschema-core: Foundational Types
//!
//! Leaf crate of the pubschema workspace. Defines the vocabulary shared by
//! the resolver, the random item generator and the example pipeline:
//!
//! 1. **Validated identifiers.** `SchemaName` and `SchemaVariant` are
//!    newtypes with checked constructors. A name is always a single
//!    non-empty path segment; a variant is always in canonical form
//!    (legacy aliases are rewritten on construction).
//!
//! 2. **`Schema` newtype.** A parsed JSON Schema document. Immutable once
//!    built; structural equality.
//!
//! 3. **`ResolverConfig`.** Where the schema repository lives. Built from
//!    the environment on demand, never cached at process scope.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pubschema-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod identifier;
pub mod schema;

pub use config::{ResolverConfig, DEFAULT_SCHEMA_DIR, SCHEMA_DIR_ENV};
pub use error::IdentifierError;
pub use identifier::{SchemaIdentifier, SchemaName, SchemaVariant, VARIANT_ALIASES};
pub use schema::{Document, Schema};
