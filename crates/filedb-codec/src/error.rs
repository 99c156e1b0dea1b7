use thiserror::Error;

/// Errors from encoding or decoding record documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The declared format name is not one the codec knows.
    #[error("unsupported record format: {0:?}")]
    UnsupportedFormat(String),

    /// The document could not be parsed.
    #[error("malformed {format} document: {message}")]
    Malformed { format: &'static str, message: String },

    /// The document parsed, but a value that must be a mapping is not.
    #[error("expected a mapping at {context}, found {found}")]
    NotAMapping { context: String, found: &'static str },

    /// The value could not be serialized.
    #[error("failed to encode {format} document: {message}")]
    Encode { format: &'static str, message: String },
}

/// Result alias for codec operations.
pub type FormatResult<T> = Result<T, FormatError>;
