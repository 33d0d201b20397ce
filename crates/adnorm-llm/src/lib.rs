//! adnorm LLM Provider Layer
//!
//! Model transports implementing the `LlmProvider` trait from `adnorm-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: scripted, deterministic responses for testing
//! - `AnthropicProvider`: Anthropic Messages API
//! - `OllamaProvider`: local Ollama API
//!
//! Providers make exactly one request per call. Retrying is the caller's
//! decision; [`Transient::is_transient`] tells it which failures are worth it.
//!
//! # Examples
//!
//! ```
//! use adnorm_domain::traits::{CompletionRequest, LlmProvider};
//! use adnorm_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("[]");
//! let request = CompletionRequest {
//!     prompt: "hello".to_string(),
//!     model: "test-model".to_string(),
//!     max_tokens: 16,
//! };
//! assert_eq!(provider.complete(&request).await.unwrap(), "[]");
//! # }
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod ollama;

use adnorm_domain::traits::{CompletionRequest, LlmProvider, Transient};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl Transient for LlmError {
    fn is_transient(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

/// A canned reply: either text or a transport failure
#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Fail(LlmError),
}

impl Scripted {
    fn into_result(self) -> Result<String, LlmError> {
        match self {
            Scripted::Text(text) => Ok(text),
            Scripted::Fail(err) => Err(err),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock LLM provider for deterministic testing
///
/// Resolution order for each call:
/// 1. the next queued reply, if any (see [`MockProvider::push_response`])
/// 2. the first rule whose needle occurs in the prompt
/// 3. the default response
///
/// Every request is recorded; clones share the record.
///
/// # Examples
///
/// ```
/// use adnorm_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("fb_us", r#"[{"campaign_name": "fb_us"}]"#);
/// provider.push_response("not json");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, Scripted)>>>,
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer with `response` whenever the prompt contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((needle.into(), Scripted::Text(response.into())));
    }

    /// Fail with `error` whenever the prompt contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>, error: LlmError) {
        lock(&self.rules).push((needle.into(), Scripted::Fail(error)));
    }

    /// Queue a one-shot response, consumed by the next call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.queue).push_back(Scripted::Text(response.into()));
    }

    /// Queue a one-shot failure, consumed by the next call
    pub fn push_error(&self, error: LlmError) {
        lock(&self.queue).push_back(Scripted::Fail(error));
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    fn reply(&self, prompt: &str) -> Scripted {
        if let Some(next) = lock(&self.queue).pop_front() {
            return next;
        }

        lock(&self.rules)
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, scripted)| scripted.clone())
            .unwrap_or_else(|| Scripted::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());
        self.reply(&request.prompt).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: prompt.to_string(),
            model: "mock".to_string(),
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any prompt")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_rules_match_substrings() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("say hello")).await.unwrap(), "world");
        assert_eq!(provider.complete(&request("foo!")).await.unwrap(), "bar");
        assert_eq!(provider.complete(&request("unknown")).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_provider_queue_takes_precedence() {
        let mut provider = MockProvider::new("default");
        provider.add_response("x", "rule");
        provider.push_response("first");
        provider.push_error(LlmError::RateLimitExceeded);

        assert_eq!(provider.complete(&request("x")).await.unwrap(), "first");
        assert_eq!(
            provider.complete(&request("x")).await.unwrap_err(),
            LlmError::RateLimitExceeded
        );
        assert_eq!(provider.complete(&request("x")).await.unwrap(), "rule");
    }

    #[tokio::test]
    async fn test_mock_provider_error_rule() {
        let mut provider = MockProvider::default();
        provider.add_error("bad", LlmError::Authentication("no key".into()));

        let result = provider.complete(&request("bad prompt")).await;
        assert!(matches!(result, Err(LlmError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("ok");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("one")).await.unwrap();
        provider.complete(&request("two")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].prompt, "two");
        assert_eq!(provider.requests()[0].max_tokens, 100);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("test")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Communication("reset".into()).is_transient());
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(!LlmError::Authentication("bad key".into()).is_transient());
        assert!(!LlmError::ModelNotAvailable("m".into()).is_transient());
        assert!(!LlmError::InvalidResponse("x".into()).is_transient());
    }
}
