//! Error types for watsonx-client

use thiserror::Error;

/// Invalid or incomplete client configuration.
///
/// Raised at startup, before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable not set
    #[error("{0} is not set")]
    Missing(&'static str),

    /// Value present but unusable
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
