//! # Resolver Configuration
//!
//! Location of the schema repository. The repository is normally checked
//! out next to the consuming project, so the default is a sibling path;
//! `CONTENT_SCHEMA_DIR` overrides it.
//!
//! The environment is read every time [`ResolverConfig::from_env`] is
//! called. Nothing is memoized at process scope, so a test that changes the
//! variable and builds a new config sees the new value.

use std::path::{Path, PathBuf};

/// Environment variable overriding the repository root.
pub const SCHEMA_DIR_ENV: &str = "CONTENT_SCHEMA_DIR";

/// Repository root used when [`SCHEMA_DIR_ENV`] is unset.
pub const DEFAULT_SCHEMA_DIR: &str = "../govuk-content-schemas";

/// Where to find schemas on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    base_dir: PathBuf,
}

impl ResolverConfig {
    /// Use an explicit repository root.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Read the repository root from [`SCHEMA_DIR_ENV`], falling back to
    /// [`DEFAULT_SCHEMA_DIR`]. An empty variable counts as unset.
    pub fn from_env() -> Self {
        let base_dir = std::env::var_os(SCHEMA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR));
        Self { base_dir }
    }

    /// Repository root.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base-dir>/dist`, the root of every published schema.
    pub fn dist_dir(&self) -> PathBuf {
        self.base_dir.join("dist")
    }

    /// `<base-dir>/dist/formats`.
    pub fn formats_dir(&self) -> PathBuf {
        self.dist_dir().join("formats")
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
