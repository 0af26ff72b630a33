//! Error taxonomy for the feedback pipeline.

/// Errors produced while rendering a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template is missing placeholder {placeholder}")]
    MissingPlaceholder { placeholder: &'static str },

    #[error("template contains placeholder {placeholder} {count} times, expected once")]
    AmbiguousPlaceholder {
        placeholder: &'static str,
        count: usize,
    },
}

/// Failures of the external text-generation service.
///
/// Transient and permanent failures are not distinguished; every variant
/// aborts the enclosing operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited by inference service: {0}")]
    RateLimited(String),

    #[error("inference service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Problems with the reviews handed to the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("input has no header row")]
    MissingHeader,

    #[error("review text is empty")]
    EmptyReview,

    #[error("malformed CSV: {0}")]
    Csv(String),

    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for InputError {
    fn from(err: csv::Error) -> Self {
        InputError::Csv(err.to_string())
    }
}

/// Top-level error for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("batch aborted at row {row} of {total}: {source}")]
    BatchAborted {
        /// 1-based position of the failing review.
        row: usize,
        total: usize,
        #[source]
        source: Box<FeedbackError>,
    },

    #[error("export failed: {0}")]
    Export(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedbackError {
    /// The inference failure behind this error, looking through batch aborts.
    pub fn inference(&self) -> Option<&InferenceError> {
        match self {
            FeedbackError::Inference(err) => Some(err),
            FeedbackError::BatchAborted { source, .. } => source.inference(),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, FeedbackError>;
