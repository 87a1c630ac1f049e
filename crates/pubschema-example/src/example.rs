//! The generate, validate, customise, revalidate pipeline.

use pubschema_core::{Schema, SchemaIdentifier};
use pubschema_random::{ItemGenerator, RandomItemGenerator};
use pubschema_schema::{SchemaResolver, SchemaValidator};
use serde_json::Value;

use crate::error::{ExampleError, GenerationError, GenerationStage};

/// Produces validated example documents for one schema.
///
/// Holds the schema, a validator compiled from it, and the item generator
/// that proposes candidates. Each call to [`payload`](Self::payload) draws
/// one candidate; nothing is cached between calls.
#[derive(Debug)]
pub struct ExampleGenerator<G = RandomItemGenerator> {
    schema: Schema,
    validator: SchemaValidator,
    generator: G,
}

impl ExampleGenerator {
    /// Generator over `schema` with an entropy-seeded random source.
    ///
    /// # Errors
    ///
    /// Fails only if `schema` cannot be compiled into a validator.
    pub fn new(schema: Schema) -> Result<Self, ExampleError> {
        let generator = RandomItemGenerator::new(schema.clone());
        Self::with_item_generator(schema, generator)
    }

    /// Generator over `schema` whose output is fixed by `seed`.
    pub fn with_seed(schema: Schema, seed: u64) -> Result<Self, ExampleError> {
        let generator = RandomItemGenerator::with_seed(schema.clone(), seed);
        Self::with_item_generator(schema, generator)
    }
}

impl<G: ItemGenerator> ExampleGenerator<G> {
    /// Generator over `schema` that takes its candidates from `generator`.
    pub fn with_item_generator(schema: Schema, generator: G) -> Result<Self, ExampleError> {
        let validator = SchemaValidator::new(&schema)?;
        Ok(Self {
            schema,
            validator,
            generator,
        })
    }

    /// The schema documents are validated against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// One valid document, as generated.
    ///
    /// # Errors
    ///
    /// [`GenerationStage::BeforeCustomisation`] if the candidate is invalid.
    pub fn payload(&mut self) -> Result<Value, GenerationError> {
        self.candidate()
    }

    /// One valid document after `customise` has been applied to it.
    ///
    /// `customise` runs exactly once, on a candidate that has already
    /// passed validation. Its return value is validated again.
    ///
    /// # Errors
    ///
    /// [`GenerationStage::BeforeCustomisation`] if the candidate is
    /// invalid (in which case `customise` is not called), or
    /// [`GenerationStage::AfterCustomisation`] if the customised document
    /// is.
    pub fn payload_with<F>(&mut self, customise: F) -> Result<Value, GenerationError>
    where
        F: FnOnce(Value) -> Value,
    {
        let document = customise(self.candidate()?);
        self.check(document, GenerationStage::AfterCustomisation)
    }

    /// `count` independently generated documents. The first invalid one
    /// aborts the run.
    pub fn payloads(&mut self, count: usize) -> Result<Vec<Value>, GenerationError> {
        (0..count).map(|_| self.payload()).collect()
    }

    fn candidate(&mut self) -> Result<Value, GenerationError> {
        let document = self.generator.generate();
        self.check(document, GenerationStage::BeforeCustomisation)
    }

    fn check(&self, document: Value, stage: GenerationStage) -> Result<Value, GenerationError> {
        let violations = self.validator.validate(&document);
        if violations.is_empty() {
            return Ok(document);
        }
        tracing::warn!(%stage, violations = violations.len(), "generated document is invalid");
        Err(GenerationError::new(stage, document, violations))
    }
}

/// Resolve `id` and produce one valid document for it.
///
/// # Errors
///
/// Resolution, validator construction and generation failures are all
/// returned unchanged inside [`ExampleError`].
pub fn for_schema(resolver: &SchemaResolver, id: &SchemaIdentifier) -> Result<Value, ExampleError> {
    tracing::debug!(schema = %id, "generating example");
    let schema = resolver.resolve(id)?;
    Ok(ExampleGenerator::new(schema)?.payload()?)
}

/// Resolve `id` and produce one valid document customised by `customise`.
pub fn for_schema_with<F>(
    resolver: &SchemaResolver,
    id: &SchemaIdentifier,
    customise: F,
) -> Result<Value, ExampleError>
where
    F: FnOnce(Value) -> Value,
{
    tracing::debug!(schema = %id, "generating customised example");
    let schema = resolver.resolve(id)?;
    Ok(ExampleGenerator::new(schema)?.payload_with(customise)?)
}
