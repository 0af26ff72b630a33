//! Boundary to the hosted text-generation service.

use async_trait::async_trait;

use crate::error::InferenceError;

/// A text-completion service.
///
/// Implementations are constructed once and shared by reference; the
/// pipeline never issues two calls at the same time.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate_text(&self, prompt: &str) -> Result<String, InferenceError>;
}
