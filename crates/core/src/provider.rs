//! Provider trait — the abstraction over the text-completion backend.
//!
//! A CompletionProvider knows how to send a single prompt to a generative
//! language model and return the completion text. The engine calls
//! `complete()` without knowing which backend is in use, which also makes
//! the generation pipeline trivially testable with a canned provider.
//!
//! Implementations: Google Gemini (the production backend), test mocks.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for one completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g. "gemini-2.0-flash").
    pub model: String,

    /// The full instruction prompt.
    pub prompt: String,

    /// Temperature (0.0 = deterministic, higher = more creative).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The completion text.
    pub text: String,

    /// Which model actually responded (may differ from requested).
    pub model: String,

    /// Token usage statistics, when the backend reports them.
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core provider trait.
///
/// Constructed once at process start from configuration and shared for the
/// lifetime of the process; per-request logic must never rebuild a client.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and get the completion back. One attempt, no retries.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_defaults() {
        let json = r#"{"model":"gemini-2.0-flash","prompt":"hello"}"#;
        let req: CompletionRequest = serde_json::from_str(json).unwrap();
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.max_output_tokens.is_none());
    }

    struct Canned;

    #[async_trait]
    impl CompletionProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                text: "ok".into(),
                model: request.model,
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn default_health_check_is_healthy() {
        let provider = Canned;
        assert!(provider.health_check().await.unwrap());
    }
}
