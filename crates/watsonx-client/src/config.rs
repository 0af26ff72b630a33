//! Typed watsonx.ai configuration, validated eagerly.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

/// Environment variable holding the watsonx.ai service URL.
pub const ENV_URL: &str = "WATSONX_URL";
/// Environment variable holding the IBM Cloud API key.
pub const ENV_API_KEY: &str = "IBM_CLOUD_API_KEY";
/// Environment variable holding the watsonx.ai project id.
pub const ENV_PROJECT_ID: &str = "WATSONX_PROJECT_ID";
/// Optional: model identifier.
pub const ENV_MODEL_ID: &str = "WATSONX_MODEL_ID";
/// Optional: IAM token endpoint base URL.
pub const ENV_IAM_URL: &str = "WATSONX_IAM_URL";
/// Optional: request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "WATSONX_TIMEOUT_SECS";

pub const DEFAULT_MODEL_ID: &str = "google/flan-ul2";
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 50;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// watsonx.ai connection and generation settings
#[derive(Clone, PartialEq)]
pub struct WatsonxConfig {
    /// Service base URL (e.g. `https://us-south.ml.cloud.ibm.com`)
    pub url: String,
    /// IBM Cloud API key, exchanged for an IAM bearer token
    pub api_key: String,
    /// Project the generation requests are billed to
    pub project_id: String,
    pub model_id: String,
    pub iam_url: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl fmt::Debug for WatsonxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatsonxConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("model_id", &self.model_id)
            .field("iam_url", &self.iam_url)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WatsonxConfig {
    /// Create a config with default model and generation parameters
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            project_id: project_id.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            iam_url: DEFAULT_IAM_URL.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_iam_url(mut self, iam_url: impl Into<String>) -> Self {
        self.iam_url = iam_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Load and validate configuration from environment variables.
    ///
    /// Required:
    /// - WATSONX_URL
    /// - IBM_CLOUD_API_KEY
    /// - WATSONX_PROJECT_ID
    ///
    /// Optional:
    /// - WATSONX_MODEL_ID (default: "google/flan-ul2")
    /// - WATSONX_IAM_URL (default: "https://iam.cloud.ibm.com")
    /// - WATSONX_TIMEOUT_SECS (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load and validate configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let mut config = Self::new(
            required(ENV_URL)?,
            required(ENV_API_KEY)?,
            required(ENV_PROJECT_ID)?,
        );

        if let Some(model_id) = lookup(ENV_MODEL_ID) {
            config.model_id = model_id;
        }
        if let Some(iam_url) = lookup(ENV_IAM_URL) {
            config.iam_url = iam_url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "timeout",
                reason: format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{secs}'"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every field; called before a client is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("url", &self.url)?;
        validate_http_url("iam_url", &self.iam_url)?;

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_PROJECT_ID));
        }
        if self.model_id.trim().is_empty() {
            return Err(invalid("model_id", "must not be empty"));
        }
        if self.max_new_tokens == 0 {
            return Err(invalid("max_new_tokens", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0.0 and 2.0"));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn validate_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("'{value}' is not a valid URL: {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid {
            field,
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
