//! Feedback Analyzer Core
//!
//! Classifies customer reviews with a hosted text-generation model:
//! - `prompt`: few-shot templates and placeholder rendering
//! - `classifier`: sentiment, then issue for negative reviews
//! - `batch`: sequential runs with progress and pacing
//! - `aggregate`: sentiment and negative-issue distributions
//! - `table`: CSV ingest and results export

pub mod aggregate;
pub mod batch;
pub mod classifier;
pub mod domain;
pub mod error;
pub mod fakes;
pub mod inference;
pub mod obs;
pub mod prompt;
pub mod table;
pub mod telemetry;

pub use aggregate::{aggregate, DistributionStats, LabelShare};
pub use batch::{BatchConfig, BatchRunner, NoProgress, ProgressSink, DEFAULT_PACING};
pub use classifier::Classifier;
pub use domain::{ClassificationResult, ResultSet, Sentiment, NOT_APPLICABLE};
pub use error::{FeedbackError, InferenceError, InputError, Result, TemplateError};
pub use inference::InferenceService;
pub use prompt::{PromptBuilder, ISSUE_CATEGORIES};
pub use table::{
    results_to_csv, write_results, ReviewTable, REPORT_FILE_NAME, RESULTS_FILE_NAME,
    RESULT_COLUMNS,
};
pub use telemetry::init_tracing;

/// Feedback analyzer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
