//! Extractive scorer abstraction.
//!
//! A scorer locates the most likely answer span for a question inside one
//! piece of context. The process shares a single scorer handle, built on
//! first use and never mutated afterwards.

pub mod http;
pub mod lexical;

pub use http::HttpScorer;
pub use lexical::LexicalScorer;

use crate::config::{ScorerConfig, ScorerKind};
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Best span a scorer found in a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSpan {
    pub answer: String,
    /// Probability-like score in `[0, 1]`
    pub score: f32,
    /// Byte offsets into the context
    pub start: usize,
    pub end: usize,
}

/// Trait for extractive question-answering backends.
#[async_trait::async_trait]
pub trait ExtractiveScorer: Send + Sync + std::fmt::Debug {
    /// Get scorer name (e.g., "lexical", "http")
    fn name(&self) -> &str;

    /// Find the best answer span for `question` in `context`.
    async fn score(&self, question: &str, context: &str) -> AppResult<ScoredSpan>;
}

/// Build a scorer from configuration.
pub fn create_scorer(
    config: &ScorerConfig,
    max_answer_words: usize,
) -> AppResult<Arc<dyn ExtractiveScorer>> {
    match config.kind {
        ScorerKind::Lexical => Ok(Arc::new(LexicalScorer::new(max_answer_words))),
        ScorerKind::Http => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                AppError::Config("scorer.endpoint is required for the http scorer".to_string())
            })?;
            Ok(Arc::new(HttpScorer::new(
                endpoint,
                max_answer_words,
                config.timeout_secs,
            )?))
        }
    }
}

static SHARED_SCORER: OnceCell<Arc<dyn ExtractiveScorer>> = OnceCell::const_new();

/// Process-wide scorer handle.
///
/// The first caller's configuration builds the scorer; later callers get the
/// same handle whatever configuration they pass.
pub async fn shared_scorer(
    config: &ScorerConfig,
    max_answer_words: usize,
) -> AppResult<Arc<dyn ExtractiveScorer>> {
    let scorer = SHARED_SCORER
        .get_or_try_init(|| async {
            let scorer = create_scorer(config, max_answer_words)?;
            tracing::info!("Extractive scorer ready: {}", scorer.name());
            Ok::<_, AppError>(scorer)
        })
        .await?;

    Ok(Arc::clone(scorer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shared_scorer_is_built_once() {
        let config = ScorerConfig::default();
        let a = shared_scorer(&config, 100).await.unwrap();
        let b = shared_scorer(&config, 50).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_http_scorer_needs_endpoint() {
        let config = ScorerConfig {
            kind: ScorerKind::Http,
            endpoint: None,
            timeout_secs: 5,
        };
        assert!(create_scorer(&config, 100).is_err());
    }

    #[test]
    fn test_create_lexical() {
        let scorer = create_scorer(&ScorerConfig::default(), 100).unwrap();
        assert_eq!(scorer.name(), "lexical");
    }
}
