//! Text-completion provider implementations for iiwake.
//!
//! All providers implement the `iiwake_core::CompletionProvider` trait.
//! The production backend is Google Gemini; the client is built once at
//! process start from configuration and shared for the process lifetime.

pub mod gemini;

pub use gemini::GeminiProvider;

use iiwake_core::{CompletionProvider, Error};
use std::sync::Arc;

/// Build the provider from configuration.
///
/// A missing API key is a fatal configuration error: it fails process
/// startup, never an individual request.
pub fn build_from_config(
    config: &iiwake_config::AppConfig,
) -> Result<Arc<dyn CompletionProvider>, Error> {
    let api_key = config.api_key.as_deref().ok_or_else(|| Error::Config {
        message: "Gemini API key is not set. Put api_key in config.toml or set GEMINI_API_KEY"
            .into(),
    })?;

    let provider = GeminiProvider::new(api_key)
        .with_timeout(std::time::Duration::from_secs(config.gateway.request_timeout_secs));

    Ok(Arc::new(provider))
}
