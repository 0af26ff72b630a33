//! Sentiment and issue classification of a single review.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ClassificationResult, Sentiment};
use crate::error::{InputError, Result};
use crate::inference::InferenceService;
use crate::prompt::PromptBuilder;

/// Classifies reviews with one sentiment call, plus one issue call for
/// negative reviews.
///
/// No caching and no retries: a failed inference call is returned as-is.
#[derive(Clone)]
pub struct Classifier {
    inference: Arc<dyn InferenceService>,
    prompts: PromptBuilder,
}

impl Classifier {
    pub fn new(inference: Arc<dyn InferenceService>) -> Self {
        Self {
            inference,
            prompts: PromptBuilder::default(),
        }
    }

    /// Use custom prompt templates.
    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Shared handle to the underlying inference service.
    pub fn inference(&self) -> Arc<dyn InferenceService> {
        Arc::clone(&self.inference)
    }

    /// Classify one review.
    pub async fn classify(&self, review: &str) -> Result<ClassificationResult> {
        let prompt = self.prompts.sentiment(review)?;
        let raw = self.inference.generate_text(&prompt).await?;
        let sentiment = Sentiment::from_model_output(&raw);
        debug!(sentiment = %sentiment, "sentiment classified");

        let issue = if sentiment.is_negative() {
            let prompt = self.prompts.issue(review)?;
            let issue = self.inference.generate_text(&prompt).await?;
            let issue = issue.trim().to_string();
            debug!(issue = %issue, "issue classified");
            Some(issue)
        } else {
            None
        };

        Ok(ClassificationResult::new(review, sentiment, issue))
    }

    /// Classify a review typed in by a user, rejecting blank input before
    /// any inference call is made.
    pub async fn analyze_single(&self, review: &str) -> Result<ClassificationResult> {
        if review.trim().is_empty() {
            return Err(InputError::EmptyReview.into());
        }
        self.classify(review).await
    }
}
