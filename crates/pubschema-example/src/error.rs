//! Errors raised while producing an example document.

use std::fmt;

use pubschema_schema::{ResolveError, SchemaValidationError, ValidationViolations};
use serde_json::Value;
use thiserror::Error;

const RULE: &str = "--------------------------";

/// Which validation pass rejected the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// The generator's own output was invalid. Points at a generator bug
    /// or a schema construct it does not handle.
    BeforeCustomisation,
    /// The generated document was valid, the customised one is not.
    /// Points at the caller's customisation.
    AfterCustomisation,
}

impl GenerationStage {
    fn summary(self) -> &'static str {
        match self {
            GenerationStage::BeforeCustomisation => {
                "An invalid content item was generated.\n\n\
                 This probably means there's a bug in the generator that causes it to output\n\
                 invalid values. Below you'll find the validation errors and the generated\n\
                 payload."
            }
            GenerationStage::AfterCustomisation => {
                "The content item you are trying to generate is invalid against the schema.\n\
                 The item was valid before being customised."
            }
        }
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::BeforeCustomisation => f.write_str("before customisation"),
            GenerationStage::AfterCustomisation => f.write_str("after customisation"),
        }
    }
}

/// A document failed validation inside the generation pipeline.
///
/// The `Display` output is the full diagnostic: a stage-specific summary,
/// the violations as pretty JSON, then the rejected document as pretty
/// JSON.
#[derive(Debug, Clone)]
pub struct GenerationError {
    stage: GenerationStage,
    document: Value,
    violations: ValidationViolations,
}

impl GenerationError {
    pub(crate) fn new(
        stage: GenerationStage,
        document: Value,
        violations: ValidationViolations,
    ) -> Self {
        Self {
            stage,
            document,
            violations,
        }
    }

    /// Pass that rejected the document.
    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    /// The rejected document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Every violation reported for it. Never empty.
    pub fn violations(&self) -> &ValidationViolations {
        &self.violations
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = serde_json::to_string_pretty(&self.document)
            .unwrap_or_else(|_| self.document.to_string());
        write!(
            f,
            "{}\n\nValidation errors:\n{RULE}\n\n{}\n\nGenerated payload:\n{RULE}\n\n{}",
            self.stage.summary(),
            self.violations.to_pretty_json(),
            document,
        )
    }
}

impl std::error::Error for GenerationError {}

/// Anything that can stop an example from being produced.
#[derive(Error, Debug)]
pub enum ExampleError {
    /// The schema could not be located or parsed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The schema could not be compiled into a validator.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// A generated or customised document was invalid.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ExampleError {
    /// The generation failure, if that is what this is.
    pub fn as_generation(&self) -> Option<&GenerationError> {
        match self {
            ExampleError::Generation(e) => Some(e),
            _ => None,
        }
    }
}
