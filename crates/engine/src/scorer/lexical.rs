//! Keyword-anchored extractive scorer.
//!
//! Needs no model files. The sentence covering the most keyword weight wins;
//! the answer is the run of non-keyword content words in that sentence
//! closest to a matched keyword, preferring capitalised words and numbers.
//! The score is the share of keyword weight the sentence covers.
//!
//! Capitalised question words name the subject, which later sentences tend
//! to refer to by pronoun, so they weigh half as much as the predicate words.

use super::{ExtractiveScorer, ScoredSpan};
use docqa_core::AppResult;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

const SUBJECT_WEIGHT: f32 = 0.5;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "me",
    "my", "of", "on", "or", "our", "she", "so", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "was", "we", "were", "what", "when",
    "where", "which", "who", "whom", "whose", "why", "will", "with", "would", "you", "your",
];

/// Deterministic keyword-overlap scorer.
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    max_answer_words: usize,
    stop_words: HashSet<&'static str>,
}

#[derive(Debug)]
struct Word<'a> {
    start: usize,
    text: &'a str,
    norm: String,
}

impl LexicalScorer {
    pub fn new(max_answer_words: usize) -> Self {
        Self {
            max_answer_words: max_answer_words.max(1),
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn is_stop(&self, norm: &str) -> bool {
        self.stop_words.contains(norm)
    }

    /// Content words of the question with their weights.
    ///
    /// The first word is never treated as a subject, since every question
    /// starts with a capital.
    fn keywords(&self, question: &str) -> HashMap<String, f32> {
        let mut keywords: HashMap<String, f32> = HashMap::new();
        for (i, word) in question.unicode_words().enumerate() {
            let norm = normalize(word);
            if self.is_stop(&norm) {
                continue;
            }
            let weight = if i > 0 && looks_like_entity(word) {
                SUBJECT_WEIGHT
            } else {
                1.0
            };
            let entry = keywords.entry(norm).or_insert(weight);
            *entry = entry.max(weight);
        }
        keywords
    }

    /// Pick the answer run inside one sentence, as word index bounds.
    fn best_run(
        &self,
        words: &[Word<'_>],
        keywords: &HashMap<String, f32>,
    ) -> Option<(usize, usize)> {
        let matched: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| keywords.contains_key(&w.norm))
            .map(|(i, _)| i)
            .collect();

        let mut runs: Vec<(usize, usize)> = Vec::new();
        let mut run_start: Option<usize> = None;
        for (i, word) in words.iter().enumerate() {
            let candidate = !keywords.contains_key(&word.norm) && !self.is_stop(&word.norm);
            match (candidate, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(s)) => {
                    runs.push((s, i));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = run_start {
            runs.push((s, words.len()));
        }

        runs.into_iter().min_by_key(|&(s, e)| {
            let entity = words[s..e].iter().any(|w| looks_like_entity(w.text));
            let distance = matched
                .iter()
                .map(|&m| if m < s { s - m } else { m.saturating_sub(e - 1) })
                .min()
                .unwrap_or(usize::MAX);
            (!entity, distance, s)
        })
    }
}

#[async_trait::async_trait]
impl ExtractiveScorer for LexicalScorer {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn score(&self, question: &str, context: &str) -> AppResult<ScoredSpan> {
        let keywords = self.keywords(question);
        if keywords.is_empty() {
            return Ok(ScoredSpan {
                answer: String::new(),
                score: 0.0,
                start: 0,
                end: 0,
            });
        }

        let total: f32 = keywords.values().sum();

        let mut best: Option<(f32, usize, &str)> = None;
        for (offset, sentence) in context.split_sentence_bound_indices() {
            let covered: HashSet<String> = sentence
                .unicode_words()
                .map(normalize)
                .filter(|w| keywords.contains_key(w))
                .collect();
            let coverage = covered.iter().map(|w| keywords[w]).sum::<f32>() / total;
            if coverage > best.map_or(0.0, |(c, _, _)| c) {
                best = Some((coverage, offset, sentence));
            }
        }

        let Some((coverage, offset, sentence)) = best else {
            return Ok(ScoredSpan {
                answer: String::new(),
                score: 0.0,
                start: 0,
                end: 0,
            });
        };

        let words: Vec<Word<'_>> = sentence
            .unicode_word_indices()
            .map(|(start, text)| Word {
                start,
                text,
                norm: normalize(text),
            })
            .collect();

        let (start, end) = match self.best_run(&words, &keywords) {
            Some((s, e)) => {
                let e = e.min(s + self.max_answer_words);
                let last = &words[e - 1];
                (words[s].start, last.start + last.text.len())
            }
            None => {
                let trimmed = sentence.trim_end();
                let lead = trimmed.len() - trimmed.trim_start().len();
                (lead, trimmed.len())
            }
        };

        Ok(ScoredSpan {
            answer: sentence[start..end].to_string(),
            score: coverage.clamp(0.0, 1.0),
            start: offset + start,
            end: offset + end,
        })
    }
}

fn normalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let lower = lower
        .strip_suffix("'s")
        .or_else(|| lower.strip_suffix("’s"))
        .unwrap_or(&lower);
    if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        lower[..lower.len() - 1].to_string()
    } else {
        lower.to_string()
    }
}

fn looks_like_entity(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = "Paris is the capital of France. It is known for the Eiffel Tower.";

    #[tokio::test]
    async fn test_capital_question() {
        let scorer = LexicalScorer::new(100);
        let span = scorer
            .score("What is the capital of France?", PARIS)
            .await
            .unwrap();

        assert_eq!(span.answer, "Paris");
        assert_eq!((span.start, span.end), (0, 5));
        assert!(span.score >= 0.99);
    }

    #[tokio::test]
    async fn test_answer_in_second_sentence() {
        let scorer = LexicalScorer::new(100);
        let span = scorer
            .score("Which tower is Paris known for?", PARIS)
            .await
            .unwrap();

        assert_eq!(span.answer, "Eiffel");
        assert_eq!(&PARIS[span.start..span.end], "Eiffel");
    }

    #[tokio::test]
    async fn test_subject_weighs_less_than_predicate() {
        let scorer = LexicalScorer::new(100);
        let span = scorer
            .score("What is France known for?", PARIS)
            .await
            .unwrap();

        assert_eq!(span.answer, "Eiffel Tower");
        assert_eq!(&PARIS[span.start..span.end], "Eiffel Tower");
        assert!(span.score > 0.5 && span.score < 1.0);
    }

    #[test]
    fn test_keyword_weights() {
        let scorer = LexicalScorer::new(100);
        let keywords = scorer.keywords("Where does France keep the Mona Lisa?");
        assert_eq!(keywords["keep"], 1.0);
        assert_eq!(keywords["france"], SUBJECT_WEIGHT);
        assert_eq!(keywords["mona"], SUBJECT_WEIGHT);
        assert!(!keywords.contains_key("where"));

        let leading = scorer.keywords("Rome population?");
        assert_eq!(leading["rome"], 1.0);
    }

    #[tokio::test]
    async fn test_no_overlap_scores_zero() {
        let scorer = LexicalScorer::new(100);
        let span = scorer
            .score("Who invented the telephone?", PARIS)
            .await
            .unwrap();
        assert_eq!(span.score, 0.0);
        assert!(span.answer.is_empty());
    }

    #[tokio::test]
    async fn test_stop_word_question() {
        let scorer = LexicalScorer::new(100);
        let span = scorer.score("What is it?", PARIS).await.unwrap();
        assert_eq!(span.score, 0.0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Towers"), "tower");
        assert_eq!(normalize("France's"), "france");
        assert_eq!(normalize("glass"), "glass");
        assert_eq!(normalize("is"), "is");
    }
}
