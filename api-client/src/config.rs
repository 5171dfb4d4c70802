// Client configuration
//
// Values come from environment variables; every field has a default except
// the AI bearer token.

use std::collections::BTreeMap;
use std::env;

use crate::errors::ApiError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_AI_API_BASE_URL: &str = "http://localhost:5000/api/dify";
pub const DEFAULT_AI_API_TIMEOUT_MS: u64 = 30_000;

/// Connection defaults for one client instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute http(s) URL prefix, e.g. "http://localhost:5000/api"
    pub base_url: String,

    pub timeout_ms: u64,

    /// Headers sent on every request
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_MS)
    }
}

impl ClientConfig {
    /// Config with a JSON content-type default header
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            base_url: base_url.into(),
            timeout_ms,
            default_headers,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Read `API_BASE_URL` and `API_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_env_with("API_BASE_URL", "API_TIMEOUT_MS", DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_MS)
    }

    fn from_env_with(
        url_var: &str,
        timeout_var: &str,
        default_url: &str,
        default_timeout_ms: u64,
    ) -> Result<Self, ApiError> {
        let base_url = env::var(url_var).unwrap_or_else(|_| default_url.to_string());
        let timeout_ms = match env::var(timeout_var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ApiError::Config(format!("{} must be an integer number of milliseconds, got `{}`", timeout_var, raw))
            })?,
            Err(_) => default_timeout_ms,
        };
        let config = Self::new(base_url, timeout_ms);
        config.validate()?;
        Ok(config)
    }

    /// Check the URL prefix and timeout
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.timeout_ms == 0 {
            return Err(ApiError::Config("timeout must be greater than 0 ms".to_string()));
        }

        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL `{}`: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ApiError::Config(format!(
                "base URL `{}` must be an absolute http(s) URL",
                self.base_url
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::Config(format!(
                "base URL `{}` must not carry a query or fragment",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub(crate) fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Configuration of the AI chat sub-client
#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub client: ClientConfig,

    /// Bearer token for the AI service
    pub api_key: String,

    /// Fixed chat user id; a timestamped one is generated when unset
    pub user: Option<String>,
}

impl AiConfig {
    pub fn new(client: ClientConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            user: None,
        }
    }

    /// Read `AI_API_BASE_URL`, `AI_API_TIMEOUT_MS`, `AI_API_KEY` and `AI_USER`
    pub fn from_env() -> Result<Self, ApiError> {
        let client = ClientConfig::from_env_with(
            "AI_API_BASE_URL",
            "AI_API_TIMEOUT_MS",
            DEFAULT_AI_API_BASE_URL,
            DEFAULT_AI_API_TIMEOUT_MS,
        )?;
        let api_key = env::var("AI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Config("AI_API_KEY is not set".to_string()))?;
        let user = env::var("AI_USER").ok().filter(|user| !user.trim().is_empty());

        Ok(Self { client, api_key, user })
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("client", &self.client)
            .field("api_key", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
