//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Connection settings for the chef REST API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent on every request, if any.
    pub auth_token: Option<SecretString>,
    /// Timeout for ordinary requests.
    pub request_timeout: Duration,
    /// Timeout for create operations.
    pub long_timeout: Duration,
    /// How many times a timed-out create request is retried.
    pub retry_count: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(30),
            long_timeout: Duration::from_secs(60),
            retry_count: 2,
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with default timeouts and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Builder: set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::from(token.into()));
        self
    }

    /// Build config from environment variables.
    ///
    /// `KSR_API_BASE_URL` is required; everything else falls back to the
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("KSR_API_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("KSR_API_BASE_URL".to_string()))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "KSR_API_BASE_URL".to_string(),
                message: format!("expected an http(s) URL, got {base_url}"),
            });
        }

        let mut config = Self::new(base_url);
        config.auth_token = lookup("KSR_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        if let Some(secs) = parse_var::<u64>(&lookup, "KSR_API_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "KSR_API_LONG_TIMEOUT_SECS")? {
            config.long_timeout = Duration::from_secs(secs);
        }
        if let Some(count) = parse_var::<u32>(&lookup, "KSR_API_RETRY_COUNT")? {
            config.retry_count = count;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("could not parse {raw:?}"),
            }),
        None => Ok(None),
    }
}
