//! watsonx.ai Client
//!
//! Implements the feedback analyzer's inference-service trait against the
//! watsonx.ai text-generation REST API:
//! - IAM API-key exchange with a cached bearer token
//! - One generation request per prompt, first result returned verbatim
//! - HTTP failures mapped to typed inference errors

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::WatsonxClient;
pub use config::{
    WatsonxConfig, DEFAULT_IAM_URL, DEFAULT_MAX_NEW_TOKENS, DEFAULT_MODEL_ID, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT, ENV_API_KEY, ENV_IAM_URL, ENV_MODEL_ID, ENV_PROJECT_ID, ENV_TIMEOUT_SECS,
    ENV_URL,
};
pub use error::ConfigError;
