//! `iiwake generate` — One-shot generation without the HTTP shell.
//!
//! Runs the same pipeline the gateway uses and prints the ranked results.

use iiwake_config::AppConfig;
use iiwake_core::ExcuseRequest;
use iiwake_engine::GenerateOptions;

pub async fn run(
    delay: String,
    target: String,
    situation: Option<String>,
    tone: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let provider = iiwake_providers::build_from_config(&config)?;
    let options = GenerateOptions::from_config(&config);

    let request = ExcuseRequest {
        delay_time: delay,
        target,
        situation,
        tone,
    };

    let reasons = iiwake_engine::generate(provider.as_ref(), &options, &request).await?;

    for reason in &reasons {
        println!("── {} ──", reason.title);
        println!("{}\n", reason.text);
    }

    Ok(())
}
