//! # Schema Resolution
//!
//! Locates schema files by convention:
//!
//! ```text
//! <base-dir>/dist/formats/<name>/<variant>/schema.json
//! ```
//!
//! The variant is already canonical by the time it reaches this module
//! (`SchemaVariant` applies the alias table on construction), so
//! `publisher` and `publisher_v2` produce the same path.
//!
//! ## No Caching
//!
//! Each call performs its own read and parse. Two callers resolving the
//! same schema do redundant work but never share state, and a file that
//! disappears or becomes malformed is reported on the very next call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pubschema_core::{IdentifierError, ResolverConfig, Schema, SchemaIdentifier};
use thiserror::Error;

/// File name of every per-variant schema.
const SCHEMA_FILE_NAME: &str = "schema.json";

/// A schema could not be resolved.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The requested name or variant is not a valid identifier.
    #[error("invalid schema identifier: {0}")]
    Identifier(#[from] IdentifierError),

    /// The file (or a directory on the way to it) could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid JSON.
    #[error("malformed JSON in '{}': {source}", .path.display())]
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ResolveError {
    /// True when the schema file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// The path this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolveError::Identifier(_) => None,
            ResolveError::Io { path, .. } | ResolveError::Parse { path, .. } => Some(path),
        }
    }
}

/// One file that could not be loaded during [`SchemaResolver::resolve_each`].
#[derive(Debug)]
pub struct ResolveFailure {
    /// File that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub error: ResolveError,
}

/// Outcome of a per-file enumeration of the repository.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// Every schema that parsed, keyed by path.
    pub schemas: BTreeMap<PathBuf, Schema>,
    /// Every file that did not.
    pub failures: Vec<ResolveFailure>,
}

impl ResolveReport {
    /// Number of files examined.
    pub fn total(&self) -> usize {
        self.schemas.len() + self.failures.len()
    }

    /// True when every file parsed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Maps schema identifiers to parsed schemas under a repository root.
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    config: ResolverConfig,
}

impl SchemaResolver {
    /// Resolver over an explicit configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolver over the repository named by `CONTENT_SCHEMA_DIR`.
    ///
    /// The environment is read here, once per resolver.
    pub fn from_env() -> Self {
        Self::new(ResolverConfig::from_env())
    }

    /// Configuration in use.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Path of the schema file for `id`. Pure; performs no I/O.
    pub fn schema_path(&self, id: &SchemaIdentifier) -> PathBuf {
        self.config
            .formats_dir()
            .join(id.name.as_str())
            .join(id.variant.as_str())
            .join(SCHEMA_FILE_NAME)
    }

    /// Read and parse the schema for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Io`] if the file cannot be read and
    /// [`ResolveError::Parse`] if it is not valid JSON. Neither is retried.
    pub fn resolve(&self, id: &SchemaIdentifier) -> Result<Schema, ResolveError> {
        let path = self.schema_path(id);
        tracing::debug!(schema = %id, path = %path.display(), "resolving schema");
        read_schema(&path)
    }

    /// Like [`resolve`](Self::resolve), from raw strings. The variant goes
    /// through the alias table.
    pub fn find(&self, name: &str, variant: &str) -> Result<Schema, ResolveError> {
        let id = SchemaIdentifier::new(name, variant)?;
        self.resolve(&id)
    }

    /// Parse every `*.json` file under `<base-dir>/dist`, keyed by path.
    ///
    /// All-or-nothing: the first unreadable directory or malformed file
    /// aborts the enumeration and nothing is returned.
    pub fn resolve_all(&self) -> Result<BTreeMap<PathBuf, Schema>, ResolveError> {
        let files = find_json_files(&self.config.dist_dir())?;
        tracing::debug!(count = files.len(), "enumerating schemas");

        let mut schemas = BTreeMap::new();
        for path in files {
            let schema = read_schema(&path)?;
            schemas.insert(path, schema);
        }
        Ok(schemas)
    }

    /// Parse every `*.json` file under `<base-dir>/dist`, isolating
    /// failures per file.
    ///
    /// A directory that cannot be listed is recorded as a failure for that
    /// directory; its siblings are still visited.
    pub fn resolve_each(&self) -> ResolveReport {
        let mut report = ResolveReport::default();
        let mut files = Vec::new();
        collect_json_files_lenient(&self.config.dist_dir(), &mut files, &mut report.failures);
        files.sort();

        for path in files {
            match read_schema(&path) {
                Ok(schema) => {
                    report.schemas.insert(path, schema);
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "schema failed to load");
                    report.failures.push(ResolveFailure { path, error });
                }
            }
        }
        report
    }

    /// Every `(name, variant)` pair that has a `schema.json` under
    /// `dist/formats`, sorted.
    pub fn list_formats(&self) -> Result<Vec<SchemaIdentifier>, ResolveError> {
        let formats_dir = self.config.formats_dir();
        let mut ids = Vec::new();

        for name_dir in read_dir_paths(&formats_dir)? {
            if !name_dir.is_dir() {
                continue;
            }
            for variant_dir in read_dir_paths(&name_dir)? {
                if !variant_dir.join(SCHEMA_FILE_NAME).is_file() {
                    continue;
                }
                let (Some(name), Some(variant)) =
                    (file_name_str(&name_dir), file_name_str(&variant_dir))
                else {
                    continue;
                };
                // A directory named after an alias normalizes to another
                // variant and cannot be addressed.
                if let Ok(id) = SchemaIdentifier::new(name, variant) {
                    if id.variant.as_str() == variant {
                        ids.push(id);
                    }
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}

impl Default for SchemaResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Resolve one schema against the repository named by the environment.
///
/// The environment is consulted on every call.
pub fn find(name: &str, variant: &str) -> Result<Schema, ResolveError> {
    SchemaResolver::from_env().find(name, variant)
}

/// Enumerate the repository named by the environment. All-or-nothing.
pub fn all() -> Result<BTreeMap<PathBuf, Schema>, ResolveError> {
    SchemaResolver::from_env().resolve_all()
}

fn read_schema(path: &Path) -> Result<Schema, ResolveError> {
    let content = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Schema::from_json_str(&content).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_dir_paths(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let io_err = |source| ResolveError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        paths.push(entry.map_err(io_err)?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Recursively find all `*.json` files under `dir`, sorted.
fn find_json_files(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let mut files = Vec::new();
    for path in read_dir_paths(dir)? {
        if path.is_dir() {
            files.extend(find_json_files(&path)?);
        } else if is_json_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn collect_json_files_lenient(
    dir: &Path,
    files: &mut Vec<PathBuf>,
    failures: &mut Vec<ResolveFailure>,
) {
    let paths = match read_dir_paths(dir) {
        Ok(paths) => paths,
        Err(error) => {
            failures.push(ResolveFailure {
                path: dir.to_path_buf(),
                error,
            });
            return;
        }
    };
    for path in paths {
        if path.is_dir() {
            collect_json_files_lenient(&path, files, failures);
        } else if is_json_file(&path) {
            files.push(path);
        }
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
