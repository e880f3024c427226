//! # iiwake Engine
//!
//! The generation pipeline: prompt construction, the completion call,
//! completion parsing, and ranking. Strictly sequential — one request,
//! one completion, one synchronous parse pass, top three out.

pub mod parser;
pub mod prompt;
pub mod ranker;

pub use parser::ParseOutcome;
pub use ranker::Weights;

use iiwake_core::provider::{CompletionProvider, CompletionRequest};
use iiwake_core::{Error, ExcuseRequest, RankedReason};
use tracing::{debug, info, warn};

/// Completion-call parameters, fixed at process start from configuration.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerateOptions {
    pub fn from_config(config: &iiwake_config::AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Run the full pipeline for one request.
///
/// Returns between one and three ranked reasons. Every failure mode —
/// upstream call failure or zero valid candidates — surfaces as an `Error`;
/// an empty success is never returned.
pub async fn generate(
    provider: &dyn CompletionProvider,
    options: &GenerateOptions,
    request: &ExcuseRequest,
) -> Result<Vec<RankedReason>, Error> {
    let prompt = prompt::build_prompt(request);
    debug!(
        provider = provider.name(),
        model = %options.model,
        prompt_chars = prompt.len(),
        "Requesting excuse completion"
    );

    let completion = provider
        .complete(CompletionRequest {
            model: options.model.clone(),
            prompt,
            temperature: options.temperature,
            max_output_tokens: Some(options.max_output_tokens),
        })
        .await?;

    let outcome = parser::parse_completion(&completion.text)?;
    if outcome.blocks_skipped > 0 {
        warn!(
            skipped = outcome.blocks_skipped,
            parsed = outcome.candidates.len(),
            "Completion contained malformed excuse blocks"
        );
    }

    let mut candidates = outcome.candidates;
    ranker::score_candidates(&mut candidates, request);
    let reasons = ranker::rank(candidates);

    info!(
        count = reasons.len(),
        tokens = completion.usage.as_ref().map(|u| u.total_tokens),
        "Excuse generation complete"
    );
    Ok(reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use iiwake_core::error::{ParseError, ProviderError};
    use iiwake_core::provider::CompletionResponse;

    /// Provider returning a canned completion (or a canned failure).
    struct MockProvider {
        reply: Result<String, ProviderError>,
    }

    impl MockProvider {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self { reply: Err(err) }
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            self.reply.clone().map(|text| CompletionResponse {
                text,
                model: request.model,
                usage: None,
            })
        }
    }

    fn options() -> GenerateOptions {
        GenerateOptions {
            model: "gemini-2.0-flash".into(),
            temperature: 0.7,
            max_output_tokens: 4096,
        }
    }

    fn request(tone: Option<&str>) -> ExcuseRequest {
        ExcuseRequest {
            delay_time: "15分".into(),
            target: "友人".into(),
            situation: None,
            tone: tone.map(String::from),
        }
    }

    /// Ten well-formed blocks with ascending scores.
    fn ten_block_completion() -> String {
        (0..10)
            .map(|i| {
                format!(
                    "言い訳その{}です。急いで向かいます。\n説得力: {}, 実現可能性: 80, 口頭説明の容易さ: 90",
                    i + 1,
                    50 + i * 5
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[tokio::test]
    async fn ten_blocks_yield_exactly_three_results() {
        let provider = MockProvider::ok(&ten_block_completion());
        let reasons = generate(&provider, &options(), &request(Some("ユーモラスに")))
            .await
            .unwrap();

        assert_eq!(reasons.len(), 3);
        // Highest persuasiveness came last in the completion.
        assert!(reasons[0].text.contains("その10"));
        assert_eq!(reasons[0].id, "reason1");
        assert_eq!(reasons[2].id, "reason3");
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = MockProvider::failing(ProviderError::Timeout("deadline".into()));
        let err = generate(&provider, &options(), &request(None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Provider(ProviderError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn unparseable_completion_is_a_parse_error() {
        let provider = MockProvider::ok("すみません、今日は何も思いつきませんでした。");
        let err = generate(&provider, &options(), &request(None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::NoCandidates { .. })
        ));
    }

    #[tokio::test]
    async fn fewer_valid_blocks_return_fewer_results() {
        let provider = MockProvider::ok(
            "寝坊しました。\n説得力: 70, 実現可能性: 90, 口頭説明の容易さ: 95\n\n評価行のないブロック",
        );
        let reasons = generate(&provider, &options(), &request(None)).await.unwrap();
        assert_eq!(reasons.len(), 1);
    }
}
