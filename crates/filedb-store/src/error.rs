use filedb_types::RevisionTag;

/// Errors from file store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// A create (empty expected tag) hit an existing file.
    #[error("file already exists: {path}")]
    AlreadyExists { path: String },

    /// The expected revision tag no longer matches the stored file.
    #[error("revision mismatch for {path}: expected {expected}, found {actual}")]
    RevisionMismatch {
        path: String,
        expected: RevisionTag,
        actual: RevisionTag,
    },

    /// The remote rejected a write as conflicting with its current state.
    #[error("write conflict at {path}: {message}")]
    Conflict { path: String, message: String },

    /// The remote API rate limit was hit.
    #[error("{} rate limit exceeded at {path}", rate_limit_kind(.secondary))]
    RateLimited {
        path: String,
        secondary: bool,
        retry_after_secs: Option<u64>,
    },

    /// Authentication or authorization failed.
    #[error("access forbidden at {path}: {message}")]
    Forbidden { path: String, message: String },

    /// Any other status returned by the remote API.
    #[error("remote API error at {path}: status {status}: {message}")]
    Api {
        path: String,
        status: u16,
        message: String,
    },

    /// The request never produced a response.
    #[error("transport failure at {path}: {message}")]
    Transport { path: String, message: String },

    /// The path is empty or escapes the store root.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Local I/O failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote configuration is incomplete.
    #[error("invalid remote configuration: {0}")]
    Config(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

fn rate_limit_kind(secondary: &bool) -> &'static str {
    if *secondary {
        "secondary"
    } else {
        "primary"
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// `true` for every optimistic-concurrency rejection.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. } | Self::RevisionMismatch { .. } | Self::Conflict { .. }
        )
    }

    /// The path the failed operation targeted, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NotFound { path }
            | Self::AlreadyExists { path }
            | Self::RevisionMismatch { path, .. }
            | Self::Conflict { path, .. }
            | Self::RateLimited { path, .. }
            | Self::Forbidden { path, .. }
            | Self::Api { path, .. }
            | Self::Transport { path, .. }
            | Self::InvalidPath { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::Config(_) | Self::Internal(_) => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_display_names_kind() {
        let primary = StoreError::RateLimited {
            path: "a.yaml".into(),
            secondary: false,
            retry_after_secs: None,
        };
        let secondary = StoreError::RateLimited {
            path: "a.yaml".into(),
            secondary: true,
            retry_after_secs: Some(60),
        };
        assert_eq!(primary.to_string(), "primary rate limit exceeded at a.yaml");
        assert_eq!(secondary.to_string(), "secondary rate limit exceeded at a.yaml");
    }

    #[test]
    fn conflict_predicates() {
        assert!(StoreError::AlreadyExists { path: "a".into() }.is_conflict());
        assert!(StoreError::Conflict {
            path: "a".into(),
            message: "sha mismatch".into()
        }
        .is_conflict());
        assert!(!StoreError::NotFound { path: "a".into() }.is_conflict());
        assert!(StoreError::NotFound { path: "a".into() }.is_not_found());
    }

    #[test]
    fn path_accessor() {
        assert_eq!(StoreError::NotFound { path: "x/y".into() }.path(), Some("x/y"));
        assert_eq!(StoreError::Internal("boom".into()).path(), None);
    }
}
