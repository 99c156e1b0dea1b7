//! Normalization of raw remote-API failures into [`StoreError`]s.

use crate::error::StoreError;

/// A raw failure reported by a remote-hosting client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteFailure {
    /// HTTP status, or `None` if no response was received.
    pub status: Option<u16>,
    /// Error message from the response body or the transport.
    pub message: String,
    /// Value of the remaining-requests rate-limit header, if sent.
    pub rate_limit_remaining: Option<u64>,
    /// Value of the retry-after header in seconds, if sent.
    pub retry_after_secs: Option<u64>,
}

impl RemoteFailure {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_rate_limit_remaining(mut self, remaining: u64) -> Self {
        self.rate_limit_remaining = Some(remaining);
        self
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }

    fn mentions_secondary_limit(&self) -> bool {
        self.message.to_ascii_lowercase().contains("secondary rate limit")
    }
}

/// Classify a remote failure on `path`.
///
/// | status            | condition                                       | result                          |
/// |-------------------|-------------------------------------------------|---------------------------------|
/// | 404               |                                                 | `NotFound`                      |
/// | 403, 429          | remaining requests is 0                         | `RateLimited { secondary: false }` |
/// | 403, 429          | message names the secondary limit, or retry-after is set | `RateLimited { secondary: true }` |
/// | 429               | otherwise                                       | `RateLimited { secondary: true }` |
/// | 401, 403          | otherwise                                       | `Forbidden`                     |
/// | 409, 412, 422     |                                                 | `Conflict`                      |
/// | any other         |                                                 | `Api`                           |
/// | none              |                                                 | `Transport`                     |
pub fn classify(path: &str, failure: RemoteFailure) -> StoreError {
    let path = path.to_string();
    let Some(status) = failure.status else {
        return StoreError::Transport {
            path,
            message: failure.message,
        };
    };

    match status {
        404 => StoreError::NotFound { path },
        403 | 429 if failure.rate_limit_remaining == Some(0) => StoreError::RateLimited {
            path,
            secondary: false,
            retry_after_secs: failure.retry_after_secs,
        },
        403 | 429 if failure.mentions_secondary_limit() || failure.retry_after_secs.is_some() => {
            StoreError::RateLimited {
                path,
                secondary: true,
                retry_after_secs: failure.retry_after_secs,
            }
        }
        429 => StoreError::RateLimited {
            path,
            secondary: true,
            retry_after_secs: None,
        },
        401 | 403 => StoreError::Forbidden {
            path,
            message: failure.message,
        },
        409 | 412 | 422 => StoreError::Conflict {
            path,
            message: failure.message,
        },
        status => StoreError::Api {
            path,
            status,
            message: failure.message,
        },
    }
}
