//! Error types for feedback-report

use feedback_core::{InferenceError, TemplateError};
use thiserror::Error;

/// Report generation failures. Any of them aborts the whole report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("summary prompt: {0}")]
    Template(#[from] TemplateError),

    #[error("narrative generation failed: {0}")]
    Narrative(#[from] InferenceError),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
