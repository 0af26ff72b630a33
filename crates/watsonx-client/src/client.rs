//! HTTP client for watsonx.ai text generation.

use std::time::Duration;

use async_trait::async_trait;
use feedback_core::{InferenceError, InferenceService};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::WatsonxConfig;
use crate::error::ConfigError;
use crate::wire::{self, GenerationRequest, API_VERSION, DEFAULT_TOKEN_TTL_SECS, IAM_GRANT_TYPE};

/// Tokens are refreshed this long before IAM says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

impl CachedToken {
    fn new(value: String, expires_in: Option<u64>, now: Instant) -> Self {
        let ttl = Duration::from_secs(expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS));
        Self {
            value,
            refresh_at: now + ttl.saturating_sub(TOKEN_REFRESH_MARGIN),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.refresh_at
    }
}

/// watsonx.ai client
///
/// Exchanges the configured API key for an IAM bearer token, caches it,
/// and issues one text-generation request per prompt.
pub struct WatsonxClient {
    config: WatsonxConfig,
    http_client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl WatsonxClient {
    /// Create a new client; fails if the configuration is invalid
    pub fn new(config: WatsonxConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("feedback-analyzer/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "http_client",
                reason: e.to_string(),
            })?;

        Ok(WatsonxClient {
            config,
            http_client,
            token: Mutex::new(None),
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(WatsonxConfig::from_env()?)
    }

    pub fn config(&self) -> &WatsonxConfig {
        &self.config
    }

    /// Fetch a token now so bad credentials surface before any work starts.
    pub async fn authenticate(&self) -> Result<(), InferenceError> {
        self.access_token().await.map(|_| ())
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation",
            self.config.url.trim_end_matches('/')
        )
    }

    fn token_url(&self) -> String {
        format!("{}/identity/token", self.config.iam_url.trim_end_matches('/'))
    }

    async fn access_token(&self) -> Result<String, InferenceError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<CachedToken, InferenceError> {
        debug!(iam_url = %self.config.iam_url, "requesting IAM access token");

        let response = self
            .http_client
            .post(self.token_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", IAM_GRANT_TYPE),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            // IAM answers a bad API key with 400, not 401
            return Err(match status.as_u16() {
                400 => InferenceError::Auth(format!("IAM rejected the API key: {body}")),
                code => wire::status_error(code, body),
            });
        }

        let token = wire::parse_token(&body)?;
        Ok(CachedToken::new(
            token.access_token,
            token.expires_in,
            Instant::now(),
        ))
    }
}

#[async_trait]
impl InferenceService for WatsonxClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, InferenceError> {
        let token = self.access_token().await?;
        let request = GenerationRequest::new(&self.config, prompt);

        let response = self
            .http_client
            .post(self.generation_url())
            .query(&[("version", API_VERSION)])
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            if matches!(status.as_u16(), 401 | 403) {
                // Drop the token so the next call re-authenticates
                *self.token.lock().await = None;
            }
            return Err(wire::status_error(status.as_u16(), body));
        }

        let text = wire::parse_generation(&body)?;
        debug!(
            model_id = %self.config.model_id,
            chars = text.len(),
            "generation completed"
        );
        Ok(text)
    }
}

fn transport_error(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Transport(format!("request timed out: {err}"))
    } else {
        InferenceError::Transport(err.to_string())
    }
}
