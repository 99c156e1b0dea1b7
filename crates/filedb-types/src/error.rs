use thiserror::Error;

/// Errors produced while loading or validating definitions.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("unsupported definition file extension: {0}")]
    UnsupportedDefinitionFile(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for type-level operations.
pub type TypeResult<T> = Result<T, TypeError>;
