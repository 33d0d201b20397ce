//! Anthropic Provider Implementation
//!
//! Calls the Anthropic Messages API with a single user turn and returns the
//! concatenated text blocks of the reply.
//!
//! # Examples
//!
//! ```no_run
//! use adnorm_llm::AnthropicProvider;
//!
//! // Reads ANTHROPIC_API_KEY from the environment (or a .env file)
//! let provider = AnthropicProvider::from_env().unwrap();
//! ```

use crate::LlmError;
use adnorm_domain::traits::{CompletionRequest, LlmProvider};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

/// Default Messages API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Default request timeout; a full batch of 100 names can take a while
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnthropicProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client,
        }
    }

    /// Create a provider from `ANTHROPIC_API_KEY`, loading `.env` if present
    pub fn from_env() -> Result<Self, LlmError> {
        let _ = dotenvy::dotenv();

        let api_key = env::var(API_KEY_VAR)
            .map_err(|_| LlmError::Authentication(format!("{} not set", API_KEY_VAR)))?;
        if api_key.trim().is_empty() {
            return Err(LlmError::Authentication(format!("{} is empty", API_KEY_VAR)));
        }

        Ok(Self::new(api_key))
    }

    /// Point the provider at a different endpoint (proxies, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LlmProvider for AnthropicProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        debug!(model = %request.model, max_tokens = request.max_tokens, "Calling Anthropic API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text, &request.model));
        }

        parse_messages_response(&text)
    }
}

/// Map a non-success HTTP status to an error
fn error_for_status(status: StatusCode, body: &str, model: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(message),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        s if s.is_server_error() => {
            LlmError::Communication(format!("HTTP {}: {}", s, message))
        }
        s => LlmError::Other(format!("HTTP {}: {}", s, message)),
    }
}

/// Extract the text content of a Messages API reply
fn parse_messages_response(body: &str) -> Result<String, LlmError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    Ok(response
        .content
        .iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adnorm_domain::traits::Transient;

    #[test]
    fn test_provider_creation() {
        let provider = AnthropicProvider::new("sk-test");
        assert_eq!(provider.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(provider.api_key, "sk-test");
    }

    #[test]
    fn test_with_endpoint() {
        let provider = AnthropicProvider::new("k").with_endpoint("http://localhost:9999/v1/messages");
        assert_eq!(provider.endpoint(), "http://localhost:9999/v1/messages");
    }

    #[test]
    fn test_parse_text_blocks() {
        let body = r#"{
            "id": "msg_1",
            "content": [
                {"type": "text", "text": "[{\"campaign_name\": "},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "\"a\"}]"}
            ]
        }"#;
        let text = parse_messages_response(body).unwrap();
        assert_eq!(text, r#"[{"campaign_name": "a"}]"#);
    }

    #[test]
    fn test_parse_invalid_body() {
        let result = parse_messages_response("<html>bad gateway</html>");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#;
        assert_eq!(
            error_for_status(StatusCode::UNAUTHORIZED, body, "m"),
            LlmError::Authentication("invalid x-api-key".to_string())
        );
        assert_eq!(
            error_for_status(StatusCode::TOO_MANY_REQUESTS, "{}", "m"),
            LlmError::RateLimitExceeded
        );
        assert_eq!(
            error_for_status(StatusCode::NOT_FOUND, "", "claude-x"),
            LlmError::ModelNotAvailable("claude-x".to_string())
        );
        assert!(error_for_status(StatusCode::BAD_GATEWAY, "", "m").is_transient());
        assert!(error_for_status(StatusCode::from_u16(529).unwrap(), "", "m").is_transient());
        assert!(!error_for_status(StatusCode::BAD_REQUEST, "", "m").is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = AnthropicProvider::new("k").with_endpoint("http://localhost:99999/v1/messages");
        let request = CompletionRequest {
            prompt: "p".to_string(),
            model: "m".to_string(),
            max_tokens: 1,
        };

        let result = provider.complete(&request).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
