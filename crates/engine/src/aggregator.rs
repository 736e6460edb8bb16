//! Aggregation of per-chunk extraction results.

use crate::config::QaConfig;
use crate::expand::{expand_to_sentence, ExpansionRules};
use crate::extractor::extract;
use crate::scorer::ExtractiveScorer;
use crate::types::{AggregatedAnswer, Chunk, Confidence, ExtractionResult};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Confidence band for a score.
pub fn classify(score: f32, medium: f32, high: f32) -> Confidence {
    if score >= high {
        Confidence::High
    } else if score >= medium {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Highest-scoring result; the earliest chunk wins ties.
///
/// Returns `None` when nothing scored above zero.
pub fn select_best(results: &[ExtractionResult]) -> Option<&ExtractionResult> {
    let mut best: Option<&ExtractionResult> = None;
    for result in results {
        let better = match best {
            None => result.score > 0.0,
            Some(current) => {
                result.score > current.score
                    || (result.score == current.score && result.chunk_index < current.chunk_index)
            }
        };
        if better {
            best = Some(result);
        }
    }
    best
}

/// Runs the extractive resolver over a document's chunks.
#[derive(Debug, Clone)]
pub struct Aggregator {
    scorer: Arc<dyn ExtractiveScorer>,
    config: Arc<QaConfig>,
}

impl Aggregator {
    pub fn new(scorer: Arc<dyn ExtractiveScorer>, config: Arc<QaConfig>) -> Self {
        Self { scorer, config }
    }

    /// Best answer for `question` across `chunks`.
    pub async fn answer(&self, question: &str, chunks: &[Chunk]) -> AggregatedAnswer {
        let results = self.extract_all(question, chunks).await;

        match select_best(&results) {
            Some(best) => {
                let answer = self.finalize(best, chunks);
                tracing::info!(
                    "Best answer from chunk {} (score {:.3}, {})",
                    best.chunk_index,
                    answer.score,
                    answer.confidence
                );
                answer
            }
            None => {
                tracing::info!("No chunk scored above zero for: {}", question);
                AggregatedAnswer::not_found()
            }
        }
    }

    /// Up to `k` answers, one per chunk, best first.
    ///
    /// Zero-score chunks are dropped; equal scores keep document order.
    pub async fn top_answers(
        &self,
        question: &str,
        chunks: &[Chunk],
        k: usize,
    ) -> Vec<AggregatedAnswer> {
        let mut results: Vec<ExtractionResult> = self
            .extract_all(question, chunks)
            .await
            .into_iter()
            .filter(|r| r.score > 0.0)
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.chunk_index.cmp(&b.chunk_index))
        });

        results
            .iter()
            .take(k)
            .map(|r| self.finalize(r, chunks))
            .collect()
    }

    /// Score every chunk, at most `worker_pool_size` at a time.
    ///
    /// Results come back in chunk order.
    async fn extract_all(&self, question: &str, chunks: &[Chunk]) -> Vec<ExtractionResult> {
        let scorer = self.scorer.as_ref();
        let max_words = self.config.max_answer_words;

        stream::iter(chunks)
            .map(|chunk| extract(scorer, question, chunk, max_words))
            .buffered(self.config.worker_pool_size.max(1))
            .collect::<Vec<_>>()
            .await
    }

    fn finalize(&self, result: &ExtractionResult, chunks: &[Chunk]) -> AggregatedAnswer {
        let config = &self.config;
        let word_count = result.answer_span.unicode_words().count();

        let expanded_sentence = match chunks.iter().find(|c| c.index == result.chunk_index) {
            Some(chunk)
                if word_count <= config.expand_below_words
                    && result.score > config.min_expand_score =>
            {
                expand_to_sentence(
                    &chunk.text,
                    result.span_start,
                    result.span_end,
                    ExpansionRules {
                        delimiters: &config.sentence_delimiters,
                        max_chars: config.max_expansion_chars,
                    },
                )
            }
            _ => result.answer_span.clone(),
        };

        AggregatedAnswer {
            raw_span: result.answer_span.clone(),
            expanded_sentence,
            score: result.score,
            confidence: classify(result.score, config.medium_confidence, config.high_confidence),
            source_chunk_index: Some(result.chunk_index),
        }
    }
}
