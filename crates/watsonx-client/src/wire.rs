//! watsonx.ai and IAM request/response bodies.

use feedback_core::InferenceError;
use serde::{Deserialize, Serialize};

use crate::config::WatsonxConfig;

/// Query-string API version pinned for text generation.
pub const API_VERSION: &str = "2023-05-29";

/// Grant type for exchanging an API key for an IAM token.
pub const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Token lifetime assumed when IAM omits `expires_in`.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub model_id: &'a str,
    pub input: &'a str,
    pub project_id: &'a str,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(config: &'a WatsonxConfig, prompt: &'a str) -> Self {
        Self {
            model_id: &config.model_id,
            input: prompt,
            project_id: &config.project_id,
            parameters: GenerationParameters {
                max_new_tokens: config.max_new_tokens,
                temperature: config.temperature,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Extract the first generated text from a generation response body.
pub fn parse_generation(body: &str) -> Result<String, InferenceError> {
    let response: GenerationResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::MalformedResponse(format!("generation body: {e}")))?;

    response
        .results
        .into_iter()
        .next()
        .map(|r| r.generated_text)
        .ok_or_else(|| InferenceError::MalformedResponse("generation returned no results".into()))
}

/// Parse an IAM token response body.
pub fn parse_token(body: &str) -> Result<TokenResponse, InferenceError> {
    let token: TokenResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::MalformedResponse(format!("IAM token body: {e}")))?;
    if token.access_token.is_empty() {
        return Err(InferenceError::MalformedResponse(
            "IAM returned an empty access token".into(),
        ));
    }
    Ok(token)
}

/// Map a non-success HTTP status to an inference error.
pub fn status_error(status: u16, body: String) -> InferenceError {
    match status {
        401 | 403 => InferenceError::Auth(format!("HTTP {status}: {body}")),
        429 => InferenceError::RateLimited(body),
        _ => InferenceError::Status { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_model_project_and_parameters() {
        let config = WatsonxConfig::new("https://example.com", "key", "proj-1");
        let body = serde_json::to_value(GenerationRequest::new(&config, "Review: hi")).unwrap();

        assert_eq!(body["model_id"], "google/flan-ul2");
        assert_eq!(body["project_id"], "proj-1");
        assert_eq!(body["input"], "Review: hi");
        assert_eq!(body["parameters"]["max_new_tokens"], 50);
        let temperature = body["parameters"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[test]
    fn first_generated_text_is_returned_verbatim() {
        let body = r#"{
            "model_id": "google/flan-ul2",
            "results": [
                {"generated_text": " Negative ", "generated_token_count": 2, "stop_reason": "eos_token"},
                {"generated_text": "ignored"}
            ]
        }"#;
        assert_eq!(parse_generation(body).unwrap(), " Negative ");
    }

    #[test]
    fn empty_results_are_malformed() {
        let err = parse_generation(r#"{"results": []}"#).unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_generation("<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn token_body_parses_with_and_without_expiry() {
        let token = parse_token(r#"{"access_token":"abc","expires_in":3600,"token_type":"Bearer"}"#)
            .unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, Some(3600));

        let token = parse_token(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.expires_in, None);

        assert!(parse_token(r#"{"access_token":""}"#).is_err());
    }

    #[test]
    fn statuses_map_to_error_kinds() {
        assert!(matches!(status_error(401, "no".into()), InferenceError::Auth(_)));
        assert!(matches!(status_error(403, "no".into()), InferenceError::Auth(_)));
        assert!(matches!(
            status_error(429, "slow down".into()),
            InferenceError::RateLimited(_)
        ));
        assert_eq!(
            status_error(500, "boom".into()),
            InferenceError::Status {
                status: 500,
                body: "boom".into()
            }
        );
    }
}
