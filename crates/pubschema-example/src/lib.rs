//! # pubschema-example
//!
//! Turns a schema into a validated example document.
//!
//! ```text
//! generate ──▶ validate ──▶ [customise ──▶ validate] ──▶ document
//!                 │                            │
//!                 ▼                            ▼
//!      GenerationError (before)     GenerationError (after)
//! ```
//!
//! A candidate that fails validation is never repaired or regenerated.
//! The error carries the candidate and every violation, and its message
//! prints both, so a failing fixture can be diagnosed from the message
//! alone.

pub mod error;
pub mod example;

pub use error::{ExampleError, GenerationError, GenerationStage};
pub use example::{for_schema, for_schema_with, ExampleGenerator};
