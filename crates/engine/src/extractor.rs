//! Extractive resolver: one question against one chunk.

use crate::scorer::ExtractiveScorer;
use crate::types::{Chunk, ExtractionResult};
use unicode_segmentation::UnicodeSegmentation;

/// Score `question` against `chunk`.
///
/// Never fails. Scorer errors and spans that do not fit the chunk text are
/// logged and turned into a zero-score, empty-span result.
pub async fn extract(
    scorer: &dyn ExtractiveScorer,
    question: &str,
    chunk: &Chunk,
    max_answer_words: usize,
) -> ExtractionResult {
    let span = match scorer.score(question, &chunk.text).await {
        Ok(span) => span,
        Err(e) => {
            tracing::warn!("Scorer failed on chunk {}: {}", chunk.index, e);
            return ExtractionResult::empty(chunk.index);
        }
    };

    let text = &chunk.text;
    if span.start > span.end
        || span.end > text.len()
        || !text.is_char_boundary(span.start)
        || !text.is_char_boundary(span.end)
    {
        tracing::warn!(
            "Scorer span {}..{} does not fit chunk {} ({} bytes)",
            span.start,
            span.end,
            chunk.index,
            text.len()
        );
        return ExtractionResult::empty(chunk.index);
    }

    let score = if span.score.is_finite() {
        span.score.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (start, end) = trim_span(text, span.start, span.end);
    if start == end || score == 0.0 {
        return ExtractionResult::empty(chunk.index);
    }
    let end = limit_words(text, start, end, max_answer_words);

    tracing::debug!(
        "Chunk {}: span {:?} (score {:.3})",
        chunk.index,
        &text[start..end],
        score
    );

    ExtractionResult {
        chunk_index: chunk.index,
        answer_span: text[start..end].to_string(),
        score,
        span_start: start,
        span_end: end,
    }
}

/// Shrink a span to exclude surrounding whitespace.
fn trim_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let slice = &text[start..end];
    let lead = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    (start + lead, start + lead + trimmed.len())
}

/// End offset after keeping at most `max_words` words of the span.
fn limit_words(text: &str, start: usize, end: usize, max_words: usize) -> usize {
    match text[start..end].unicode_word_indices().nth(max_words) {
        // Cut just before the first excess word, then drop trailing whitespace.
        Some((offset, _)) => start + text[start..start + offset].trim_end().len(),
        None => end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::ScoredSpan;
    use docqa_core::{AppError, AppResult};

    #[derive(Debug)]
    struct FixedScorer(AppResult<ScoredSpan>);

    #[async_trait::async_trait]
    impl ExtractiveScorer for FixedScorer {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn score(&self, _question: &str, _context: &str) -> AppResult<ScoredSpan> {
            match &self.0 {
                Ok(span) => Ok(span.clone()),
                Err(e) => Err(AppError::Scorer(e.to_string())),
            }
        }
    }

    fn chunk(text: &str) -> Chunk {
        Chunk {
            index: 3,
            text: text.to_string(),
            start_offset: 0,
            end_offset: text.len(),
        }
    }

    fn span(start: usize, end: usize, score: f32) -> FixedScorer {
        FixedScorer(Ok(ScoredSpan {
            answer: String::new(),
            score,
            start,
            end,
        }))
    }

    #[tokio::test]
    async fn test_scorer_error_becomes_zero() {
        let scorer = FixedScorer(Err(AppError::Scorer("model missing".into())));
        let result = extract(&scorer, "q", &chunk("some text"), 100).await;
        assert_eq!(result, ExtractionResult::empty(3));
    }

    #[tokio::test]
    async fn test_out_of_range_span_becomes_zero() {
        let result = extract(&span(2, 40, 0.9), "q", &chunk("short"), 100).await;
        assert_eq!(result.score, 0.0);
        assert!(result.answer_span.is_empty());
    }

    #[tokio::test]
    async fn test_score_is_clamped_and_span_trimmed() {
        let result = extract(&span(0, 7, 1.7), "q", &chunk(" Paris  is nice"), 100).await;
        assert_eq!(result.score, 1.0);
        assert_eq!(result.answer_span, "Paris");
        assert_eq!((result.span_start, result.span_end), (1, 6));
    }

    #[tokio::test]
    async fn test_long_span_is_cut_to_word_limit() {
        let text = "one two three four five six";
        let result = extract(&span(0, text.len(), 0.5), "q", &chunk(text), 3).await;
        assert_eq!(result.answer_span, "one two three");
    }

    #[tokio::test]
    async fn test_non_finite_score() {
        let result = extract(&span(0, 5, f32::NAN), "q", &chunk("Paris"), 100).await;
        assert_eq!(result.score, 0.0);
    }
}
