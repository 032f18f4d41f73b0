//! Record service endpoint configuration.

use std::env;

use thiserror::Error;
use url::Url;

/// Base URL of the hosted record service.
pub const DEFAULT_API_URL: &str = "https://careflow-api.onrender.com";

/// Environment variable overriding [`DEFAULT_API_URL`].
pub const API_URL_ENV: &str = "CAREFLOW_API_URL";

const COLLECTION: &str = "patients";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid record service URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("record service URL must use http or https, got {0}")]
    UnsupportedScheme(String),
}

/// Where the patient collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    /// Validate a base URL. Any path on it is kept as a prefix of `/patients`.
    pub fn new(base_url: Url) -> Result<Self, ConfigError> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        Ok(Self { base_url })
    }

    /// Parse and validate a base URL string.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
            value: value.to_string(),
            source,
        })?;
        Self::new(base_url)
    }

    /// Read `CAREFLOW_API_URL`, falling back to the hosted service.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(API_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::parse(value.trim()),
            _ => Self::parse(DEFAULT_API_URL),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/patients`
    pub fn collection_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(COLLECTION);
        }
        url
    }

    /// `{base}/patients/{id}`, with `id` encoded as one path segment.
    pub fn record_url(&self, id: &str) -> Url {
        let mut url = self.collection_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }
}
