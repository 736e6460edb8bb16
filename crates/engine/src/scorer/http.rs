//! Extractive QA model served over HTTP.
//!
//! Speaks the Hugging Face question-answering payload, as exposed by the
//! Inference API and by text-generation-inference style local servers.

use super::{ExtractiveScorer, ScoredSpan};
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
    parameters: QaParameters,
}

#[derive(Debug, Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct QaParameters {
    max_answer_len: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QaResponse {
    Single(QaAnswer),
    Ranked(Vec<QaAnswer>),
}

#[derive(Debug, Deserialize)]
struct QaAnswer {
    answer: String,
    score: f32,
    /// Character offsets into the context
    start: usize,
    end: usize,
}

/// HTTP extractive scorer.
#[derive(Debug)]
pub struct HttpScorer {
    endpoint: String,
    max_answer_words: usize,
    client: reqwest::Client,
}

impl HttpScorer {
    pub fn new(
        endpoint: impl Into<String>,
        max_answer_words: usize,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Scorer(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            max_answer_words,
            client,
        })
    }
}

#[async_trait::async_trait]
impl ExtractiveScorer for HttpScorer {
    fn name(&self) -> &str {
        "http"
    }

    async fn score(&self, question: &str, context: &str) -> AppResult<ScoredSpan> {
        let body = QaRequest {
            inputs: QaInputs { question, context },
            parameters: QaParameters {
                max_answer_len: self.max_answer_words,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Scorer(format!("Failed to reach scorer: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Scorer(format!(
                "Scorer error ({}): {}",
                status, error_text
            )));
        }

        let parsed: QaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Scorer(format!("Failed to parse scorer response: {}", e)))?;

        to_scored_span(parsed, context)
    }
}

fn to_scored_span(response: QaResponse, context: &str) -> AppResult<ScoredSpan> {
    let answer = match response {
        QaResponse::Single(answer) => answer,
        QaResponse::Ranked(answers) => answers
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Scorer("Scorer returned no answers".to_string()))?,
    };

    let start = char_to_byte(context, answer.start)?;
    let end = char_to_byte(context, answer.end)?;
    if start > end {
        return Err(AppError::Scorer(format!(
            "Scorer returned inverted span {}..{}",
            answer.start, answer.end
        )));
    }

    Ok(ScoredSpan {
        answer: answer.answer,
        score: answer.score,
        start,
        end,
    })
}

/// Convert a character offset to a byte offset; `len` maps to the end.
fn char_to_byte(context: &str, char_offset: usize) -> AppResult<usize> {
    context
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(context.len()))
        .nth(char_offset)
        .ok_or_else(|| {
            AppError::Scorer(format!(
                "Scorer offset {} is outside the context",
                char_offset
            ))
        })
}
