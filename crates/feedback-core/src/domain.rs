//! Domain models for review classification.

use serde::Serialize;
use std::fmt;

/// Issue label used when a review is not negative.
pub const NOT_APPLICABLE: &str = "N/A";

/// Sentiment of a review as reported by the model.
///
/// Known labels are matched case-insensitively. Anything else is kept
/// verbatim in [`Sentiment::Unrecognized`] so it can still be displayed
/// and counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unrecognized(String),
}

impl Sentiment {
    /// Normalize raw model output into a sentiment.
    pub fn from_model_output(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            _ => Sentiment::Unrecognized(trimmed.to_string()),
        }
    }

    /// Display label; raw model text for unrecognized output.
    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Unrecognized(raw) if raw.is_empty() => "Unrecognized",
            Sentiment::Unrecognized(raw) => raw,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.label().to_string()
    }
}

/// Classification of a single review.
///
/// `issue` is present exactly when the sentiment is negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    review: String,
    sentiment: Sentiment,
    issue: Option<String>,
}

impl ClassificationResult {
    /// Build a result, keeping `issue` only for negative sentiment.
    ///
    /// A negative result without an issue records an empty issue label.
    pub fn new(review: impl Into<String>, sentiment: Sentiment, issue: Option<String>) -> Self {
        let issue = if sentiment.is_negative() {
            Some(issue.unwrap_or_default())
        } else {
            None
        };
        Self {
            review: review.into(),
            sentiment,
            issue,
        }
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    pub fn sentiment(&self) -> &Sentiment {
        &self.sentiment
    }

    pub fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }

    /// Issue label for display and export, `N/A` when absent.
    pub fn issue_label(&self) -> &str {
        self.issue.as_deref().unwrap_or(NOT_APPLICABLE)
    }
}

/// Ordered classifications, one per input review.
pub type ResultSet = Vec<ClassificationResult>;
