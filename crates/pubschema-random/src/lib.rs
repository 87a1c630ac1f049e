//! # pubschema-random
//!
//! Produces random candidate documents from a JSON Schema.
//!
//! Documents are *candidates*: the generator honours the keywords it
//! understands but does not solve every combination, so callers validate
//! what it returns. `pubschema-example` wraps it in exactly that loop.
//!
//! ## Modules
//!
//! - [`generator`]: schema walker behind [`RandomItemGenerator`].
//! - [`pattern`]: strings matching a regular expression.
//! - [`text`]: lorem words and `format`-specific strings.
//!
//! ## Seeding
//!
//! [`RandomItemGenerator::with_seed`] makes a run reproducible. The default
//! constructor draws its seed from the operating system.

pub mod generator;
pub mod pattern;
pub mod text;

pub use generator::{RandomItemGenerator, MAX_DEPTH};

use serde_json::Value;

/// Source of candidate documents.
///
/// Implemented by [`RandomItemGenerator`]; other implementations replace it
/// in tests or to produce fixed documents.
pub trait ItemGenerator {
    /// Produce the next candidate document.
    fn generate(&mut self) -> Value;
}

impl<F> ItemGenerator for F
where
    F: FnMut() -> Value,
{
    fn generate(&mut self) -> Value {
        self()
    }
}
