//! # Schema Validation
//!
//! Runtime validation of JSON documents against a single JSON Schema.
//!
//! ## Invariant
//!
//! Validation is the gate every generated document passes through. A
//! document is valid only when [`SchemaValidator::validate`] returns an
//! empty [`ValidationViolations`]; every violation carries the instance
//! path, the schema path and a human-readable message.
//!
//! ## Draft Detection
//!
//! The draft is taken from the schema's `$schema` keyword. Content schemas
//! declare draft-04; schemas without `$schema` are validated under the
//! `jsonschema` crate's default draft.
//!
//! ## Offline References
//!
//! Internal `$ref`s (`#/definitions/...`) are resolved by the jsonschema
//! crate natively. Any other reference is refused by [`OfflineRetriever`]
//! and surfaces as a build error.

use std::fmt;
use std::path::Path;

use jsonschema::{Retrieve, Uri, Validator};
use pubschema_core::Schema;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Retriever that refuses every external reference.
///
/// Keeps validation deterministic and free of network access.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external $ref '{}' is not available offline", uri.as_str()).into())
    }
}

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema could not be compiled.
    #[error("validator build error: {reason}")]
    ValidatorBuild {
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    /// True when the violation is located at or below `/<field>` in the
    /// instance, or its message names `field`.
    pub fn concerns(&self, field: &str) -> bool {
        let pointer = format!("/{field}");
        self.instance_path == pointer
            || self.instance_path.starts_with(&format!("{pointer}/"))
            || self.message.contains(field)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Ordered collection of validation violations. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Wrap an existing list.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over the violations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// True if any violation concerns `field`. See [`Violation::concerns`].
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.concerns(field))
    }

    /// Render as an indented JSON array.
    pub fn to_pretty_json(&self) -> String {
        // Serializing plain strings into a Vec cannot fail.
        serde_json::to_string_pretty(&self.violations).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled validator for one schema.
///
/// Compilation happens once at construction; each call to
/// [`validate`](Self::validate) computes a fresh violation list.
pub struct SchemaValidator {
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidatorBuild`] if the schema is
    /// not a valid JSON Schema or references an external document.
    pub fn new(schema: &Schema) -> Result<Self, SchemaValidationError> {
        tracing::debug!(
            draft = schema.draft_uri().unwrap_or("default"),
            "compiling validator"
        );
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);
        let validator = opts
            .build(schema.as_value())
            .map_err(|e| SchemaValidationError::ValidatorBuild {
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Validate `instance`, returning every violation in the order the
    /// validator reports them.
    pub fn validate(&self, instance: &Value) -> ValidationViolations {
        let violations = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        ValidationViolations { violations }
    }

    /// Boolean shortcut for [`validate`](Self::validate).
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Load a JSON or YAML document from disk.
///
/// The format is chosen from the file extension: `.yaml`/`.yml` are read
/// as YAML straight into a JSON value tree; anything else is parsed as
/// JSON. YAML that has no JSON equivalent (non-string keys, non-finite
/// floats) is a load error.
pub fn load_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let load_err = |reason: String| SchemaValidationError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_err(format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            serde_yaml::from_str(&content).map_err(|e| load_err(format!("invalid YAML: {e}")))
        }
        _ => serde_json::from_str(&content).map_err(|e| load_err(format!("invalid JSON: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_path_schema() -> Schema {
        Schema::new(json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "type": "object",
            "required": ["base_path"],
            "additionalProperties": false,
            "properties": {
                "base_path": { "type": "string", "pattern": "^/[a-z0-9-]+$" },
                "title": { "type": "string" }
            }
        }))
    }

    #[test]
    fn valid_document_has_no_violations() {
        let v = SchemaValidator::new(&base_path_schema()).unwrap();
        let violations = v.validate(&json!({"base_path": "/vat-rates", "title": "VAT"}));
        assert!(violations.is_empty(), "unexpected: {violations}");
        assert!(v.is_valid(&json!({"base_path": "/x"})));
    }

    #[test]
    fn missing_required_field_reported() {
        let v = SchemaValidator::new(&base_path_schema()).unwrap();
        let violations = v.validate(&json!({"title": "no path"}));
        assert_eq!(violations.len(), 1);
        assert!(violations.mentions("base_path"), "got: {violations}");
        assert_eq!(violations.violations()[0].instance_path, "");
    }

    #[test]
    fn pattern_violation_points_at_field() {
        let v = SchemaValidator::new(&base_path_schema()).unwrap();
        let violations = v.validate(&json!({"base_path": "INVALID PATH"}));
        assert!(!violations.is_empty());
        let first = &violations.violations()[0];
        assert_eq!(first.instance_path, "/base_path");
        assert!(first.schema_path.contains("pattern"), "got: {}", first.schema_path);
    }

    #[test]
    fn every_violation_is_reported() {
        let v = SchemaValidator::new(&base_path_schema()).unwrap();
        let violations = v.validate(&json!({"base_path": 3, "title": false, "extra": 1}));
        assert!(violations.len() >= 3, "got: {violations}");
    }

    #[test]
    fn invalid_schema_fails_to_build() {
        let err = SchemaValidator::new(&Schema::new(json!({"type": 12}))).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidatorBuild { .. }));
    }

    #[test]
    fn remote_ref_is_refused() {
        let schema = Schema::new(json!({
            "$ref": "https://example.invalid/schemas/remote.json"
        }));
        let err = SchemaValidator::new(&schema).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidatorBuild { .. }));
    }

    #[test]
    fn local_definitions_resolve() {
        let schema = Schema::new(json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "type": "object",
            "properties": { "path": { "$ref": "#/definitions/absolute_path" } },
            "definitions": {
                "absolute_path": { "type": "string", "pattern": "^/" }
            }
        }));
        let v = SchemaValidator::new(&schema).unwrap();
        assert!(v.is_valid(&json!({"path": "/a"})));
        assert!(!v.is_valid(&json!({"path": "a"})));
    }

    #[test]
    fn violations_pretty_json() {
        let violations = ValidationViolations::new(vec![Violation {
            instance_path: "/base_path".to_string(),
            schema_path: "/properties/base_path/pattern".to_string(),
            message: r#""INVALID PATH" does not match "^/[a-z0-9-]+$""#.to_string(),
        }]);
        let rendered = violations.to_pretty_json();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["instance_path"], "/base_path");
        assert!(rendered.contains('\n'));
    }

    #[test]
    fn violation_concerns_field() {
        let v = Violation {
            instance_path: "/details/body".to_string(),
            schema_path: "/properties/details/properties/body/type".to_string(),
            message: "3 is not of type \"string\"".to_string(),
        };
        assert!(v.concerns("details"));
        assert!(!v.concerns("detail"));
        assert!(!v.concerns("title"));
    }

    #[test]
    fn violations_display_one_per_line() {
        let violations = ValidationViolations::new(vec![
            Violation {
                instance_path: String::new(),
                schema_path: "/required".to_string(),
                message: r#""base_path" is a required property"#.to_string(),
            },
            Violation {
                instance_path: "/title".to_string(),
                schema_path: "/properties/title/type".to_string(),
                message: "false is not of type \"string\"".to_string(),
            },
        ]);
        let rendered = violations.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  (root): "));
        assert!(lines[1].starts_with("  /title: "));
    }

    fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn yaml_and_json_documents_load_alike() {
        let (_j, json_path) = write_temp("answer.json", r#"{"base_path": "/vat-rates", "count": 2}"#);
        let (_y, yaml_path) = write_temp("answer.yml", "base_path: /vat-rates\ncount: 2\n");
        let from_json = load_document(&json_path).unwrap();
        let from_yaml = load_document(&yaml_path).unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_yaml["count"], 2);
    }

    #[test]
    fn unloadable_documents_name_their_path() {
        let (_d, bad_json) = write_temp("broken.json", "{ nope");
        let (_y, bad_yaml) = write_temp("broken.yaml", "? [a, b]\n: c\n");
        for path in [bad_json, bad_yaml] {
            match load_document(&path).unwrap_err() {
                SchemaValidationError::DocumentLoad { path: p, .. } => {
                    assert!(p.ends_with(path.file_name().unwrap().to_str().unwrap()))
                }
                other => panic!("expected load error, got: {other}"),
            }
        }
        assert!(load_document(Path::new("/definitely/missing.json")).is_err());
    }
}
