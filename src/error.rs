//! Error types for model building, configuration loading and bundle output.

use thiserror::Error;

/// Errors raised while turning a JSON document into a class model.
/// Every variant aborts the whole build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Input text is not well-formed JSON.
    #[error("input is not well-formed JSON: {0}")]
    InputParse(#[from] serde_json::Error),

    /// Root is not an object, or is an empty object.
    #[error("expected a non-empty JSON object as root, found {found}")]
    InvalidRoot { found: &'static str },

    /// Zero-element array; its element type cannot be inferred.
    #[error("cannot infer element type of empty array at {path}")]
    EmptyArray { path: String },

    /// `null` as a field value or as the first array element.
    #[error("cannot infer type of null value at {path}")]
    NullValue { path: String },

    /// Two paths derived the same class name under `CollisionPolicy::Error`.
    #[error("class name `{name}` derived at {path} is already taken")]
    NameCollision { name: String, path: String },
}

impl BuildError {
    /// Stable kebab-case tag, used by fixture expectations.
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::InputParse(_) => "input-parse",
            BuildError::InvalidRoot { .. } => "invalid-root",
            BuildError::EmptyArray { .. } => "empty-array",
            BuildError::NullValue { .. } => "null-value",
            BuildError::NameCollision { .. } => "name-collision",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("nothing to write: the bundle is empty")]
    Empty,
}
