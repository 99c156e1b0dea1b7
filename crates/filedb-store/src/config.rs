use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// API endpoint used when no override is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Settings a remote-hosting client needs to build a [`FileStore`](crate::FileStore).
///
/// The record layer treats these as opaque; it only requires a non-empty
/// owner and repository name.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Repository owner or namespace.
    pub owner: String,
    /// Repository name.
    pub repository: String,
    /// Branch or ref to read from and commit to.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Access token. Redacted from `Debug` output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Override of the API base URL, e.g. for an enterprise host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl RemoteConfig {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            branch: default_branch(),
            token: None,
            api_base_url: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Owner and repository must be non-empty.
    pub fn validate(&self) -> StoreResult<()> {
        if self.owner.trim().is_empty() {
            return Err(StoreError::Config("owner must not be empty".into()));
        }
        if self.repository.trim().is_empty() {
            return Err(StoreError::Config("repository must not be empty".into()));
        }
        Ok(())
    }

    /// Effective API base URL, without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    /// `owner/repository@branch`, for logs and change descriptions.
    pub fn slug(&self) -> String {
        format!("{}/{}@{}", self.owner, self.repository, self.branch)
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
