//! Command handlers for the docqa CLI.

pub mod ask;
pub mod chat;
pub mod chunks;
pub mod prompts;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use chunks::ChunksCommand;
pub use prompts::PromptsCommand;

use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_engine::{Confidence, FinalAnswer, QaConfig, QaPipeline};

/// Build the answer pipeline from workspace configuration.
pub(crate) async fn build_pipeline(config: &AppConfig) -> AppResult<QaPipeline> {
    let qa_config = QaConfig::load(&config.workspace)?;
    let pipeline = QaPipeline::from_config(config, qa_config).await?;

    if !pipeline.has_collaborator() {
        tracing::info!("No generation collaborator; enhanced and recursive answers stay extractive");
    }

    Ok(pipeline)
}

/// Print degradation warnings to stderr.
pub(crate) fn report_warnings(answer: &FinalAnswer) {
    for warning in &answer.warnings {
        eprintln!("warning: {}", warning);
    }
}

/// Human-readable confidence, e.g. `Confidence: 92% (high)`.
pub(crate) fn confidence_label(score: f32, confidence: Confidence) -> String {
    format!(
        "Confidence: {:.0}% ({})",
        (score.clamp(0.0, 1.0) * 100.0).round(),
        confidence
    )
}

pub(crate) fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_label() {
        assert_eq!(
            confidence_label(0.923, Confidence::High),
            "Confidence: 92% (high)"
        );
        assert_eq!(
            confidence_label(0.5, Confidence::Medium),
            "Confidence: 50% (medium)"
        );
        assert_eq!(confidence_label(0.0, Confidence::Low), "Confidence: 0% (low)");
        assert_eq!(
            confidence_label(1.7, Confidence::High),
            "Confidence: 100% (high)"
        );
    }
}
