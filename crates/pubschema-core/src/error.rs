//! # Error Types
//!
//! Errors raised while constructing core values. Filesystem and validation
//! failures live in the crates that perform those operations.

use thiserror::Error;

/// A schema identifier could not be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Schema names must be non-empty.
    #[error("schema name must not be empty")]
    EmptyName,

    /// Variants must be non-empty.
    #[error("schema variant must not be empty")]
    EmptyVariant,

    /// The value would escape its directory when joined onto a path.
    #[error("{kind} '{value}' must be a single path segment")]
    NotASegment {
        /// Which part of the identifier was rejected ("name" or "variant").
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}
