//! In-memory inference fakes (testing only)
//!
//! `ScriptedInference` replays a fixed sequence of responses and records
//! every prompt it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::InferenceError;
use crate::inference::InferenceService;

/// Replays scripted responses in call order.
///
/// Once the script is exhausted every further call fails with
/// [`InferenceError::Transport`].
#[derive(Debug, Default)]
pub struct ScriptedInference {
    responses: Mutex<VecDeque<Result<String, InferenceError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script that answers every call successfully, in order.
    pub fn replying<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fake = Self::new();
        for response in responses {
            fake.push_ok(response);
        }
        fake
    }

    /// Queue a successful response.
    pub fn push_ok(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue a failure.
    pub fn push_err(&self, err: InferenceError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceService for ScriptedInference {
    async fn generate_text(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(InferenceError::Transport(
                    "scripted inference exhausted".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_responses_in_order_then_fails() {
        let fake = ScriptedInference::replying(["one", "two"]);

        assert_eq!(fake.generate_text("a").await.unwrap(), "one");
        assert_eq!(fake.generate_text("b").await.unwrap(), "two");
        assert!(matches!(
            fake.generate_text("c").await,
            Err(InferenceError::Transport(_))
        ));
        assert_eq!(fake.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn scripted_errors_are_returned() {
        let fake = ScriptedInference::new();
        fake.push_err(InferenceError::Auth("bad key".to_string()));

        let err = fake.generate_text("prompt").await.unwrap_err();
        assert_eq!(err, InferenceError::Auth("bad key".to_string()));
        assert_eq!(fake.remaining(), 0);
    }
}
