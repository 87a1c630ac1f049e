//! # Schema Identifiers
//!
//! A schema in the repository is addressed by a `(name, variant)` pair,
//! e.g. `("detailed_guide", "frontend")`. Both halves become directory
//! names under `dist/formats/`, so both are restricted to a single path
//! segment at construction time.
//!
//! ## Variant Aliases
//!
//! Some variants are still requested under a legacy name. The alias table
//! rewrites them to the directory that actually exists on disk. Every
//! string not present in the table passes through unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Legacy variant names and the canonical variant they resolve to.
pub const VARIANT_ALIASES: &[(&str, &str)] = &[("publisher", "publisher_v2")];

/// Name of a content format, e.g. `detailed_guide`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaName(String);

impl SchemaName {
    /// Build a schema name, rejecting empty strings and anything that is
    /// not a single path segment.
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();
        if name.is_empty() {
            return Err(IdentifierError::EmptyName);
        }
        check_segment("name", &name)?;
        Ok(Self(name))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Structural flavour of a format's schema, always in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVariant(String);

impl SchemaVariant {
    /// Build a variant, applying [`VARIANT_ALIASES`].
    pub fn new(variant: impl Into<String>) -> Result<Self, IdentifierError> {
        let variant = variant.into();
        if variant.is_empty() {
            return Err(IdentifierError::EmptyVariant);
        }
        let canonical = canonical_variant(&variant);
        check_segment("variant", canonical)?;
        Ok(Self(canonical.to_string()))
    }

    /// Schema as rendered to frontend applications.
    pub fn frontend() -> Self {
        Self("frontend".to_string())
    }

    /// Schema accepted from publishing applications.
    pub fn publisher() -> Self {
        Self("publisher_v2".to_string())
    }

    /// Schema for a format's links payload.
    pub fn links() -> Self {
        Self("links".to_string())
    }

    /// Access the canonical variant string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Apply the alias table to a raw variant string.
fn canonical_variant(raw: &str) -> &str {
    VARIANT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(raw)
}

fn check_segment(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    let escapes = value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0');
    if escapes {
        return Err(IdentifierError::NotASegment {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// A `(name, variant)` pair addressing exactly one schema file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaIdentifier {
    /// Content format name.
    pub name: SchemaName,
    /// Canonical variant.
    pub variant: SchemaVariant,
}

impl SchemaIdentifier {
    /// Build an identifier from raw strings.
    pub fn new(name: &str, variant: &str) -> Result<Self, IdentifierError> {
        Ok(Self {
            name: SchemaName::new(name)?,
            variant: SchemaVariant::new(variant)?,
        })
    }

    /// Shorthand for the frontend variant of `name`.
    pub fn frontend(name: &str) -> Result<Self, IdentifierError> {
        Ok(Self {
            name: SchemaName::new(name)?,
            variant: SchemaVariant::frontend(),
        })
    }

    /// Shorthand for the publisher variant of `name`.
    pub fn publisher(name: &str) -> Result<Self, IdentifierError> {
        Ok(Self {
            name: SchemaName::new(name)?,
            variant: SchemaVariant::publisher(),
        })
    }

    /// Shorthand for the links variant of `name`.
    pub fn links(name: &str) -> Result<Self, IdentifierError> {
        Ok(Self {
            name: SchemaName::new(name)?,
            variant: SchemaVariant::links(),
        })
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SchemaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.variant)
    }
}

impl FromStr for SchemaName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for SchemaVariant {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SchemaName {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for SchemaVariant {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SchemaName> for String {
    fn from(value: SchemaName) -> Self {
        value.0
    }
}

impl From<SchemaVariant> for String {
    fn from(value: SchemaVariant) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_alias_is_normalized() {
        let v = SchemaVariant::new("publisher").unwrap();
        assert_eq!(v.as_str(), "publisher_v2");
        assert_eq!(v, SchemaVariant::publisher());
    }

    #[test]
    fn canonical_name_passes_through() {
        assert_eq!(
            SchemaVariant::new("publisher_v2").unwrap().as_str(),
            "publisher_v2"
        );
        assert_eq!(SchemaVariant::new("frontend").unwrap().as_str(), "frontend");
        assert_eq!(
            SchemaVariant::new("something_new").unwrap().as_str(),
            "something_new"
        );
    }

    #[test]
    fn empty_name_rejected() {
        assert_eq!(SchemaName::new(""), Err(IdentifierError::EmptyName));
        assert_eq!(SchemaVariant::new(""), Err(IdentifierError::EmptyVariant));
    }

    #[test]
    fn path_traversal_rejected() {
        for bad in ["..", ".", "a/b", "a\\b", "../etc"] {
            let err = SchemaName::new(bad).unwrap_err();
            assert!(
                matches!(err, IdentifierError::NotASegment { kind: "name", .. }),
                "expected NotASegment for {bad:?}, got {err:?}"
            );
        }
        assert!(SchemaVariant::new("front/end").is_err());
    }

    #[test]
    fn identifier_display() {
        let id = SchemaIdentifier::new("detailed_guide", "publisher").unwrap();
        assert_eq!(id.to_string(), "detailed_guide/publisher_v2");
    }

    #[test]
    fn serde_applies_alias() {
        let id: SchemaIdentifier =
            serde_json::from_str(r#"{"name":"answer","variant":"publisher"}"#).unwrap();
        assert_eq!(id.variant, SchemaVariant::publisher());

        let err = serde_json::from_str::<SchemaIdentifier>(r#"{"name":"","variant":"links"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn alias_table_targets_are_canonical() {
        for (_, canonical) in VARIANT_ALIASES {
            assert_eq!(canonical_variant(canonical), *canonical);
        }
    }
}
