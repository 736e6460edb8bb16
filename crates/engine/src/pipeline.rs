//! Caller-facing answer pipeline.
//!
//! Standard mode returns the extractive answer. Enhanced mode rewrites it
//! with the generation collaborator. Recursive mode decomposes the question,
//! answers each part, synthesizes the parts and polishes the result.
//! Collaborator failures never fail a request: each stage falls back and
//! records a [`PipelineWarning`].

use crate::aggregator::Aggregator;
use crate::chunker;
use crate::collaborator::Collaborator;
use crate::config::QaConfig;
use crate::decomposer::decompose;
use crate::refiner::{refine, refine_text};
use crate::scorer::{shared_scorer, ExtractiveScorer};
use crate::synthesizer::{concatenate, synthesize};
use crate::types::{
    AggregatedAnswer, AnswerMode, Chunk, Document, FinalAnswer, PipelineWarning, SubQuestion,
    INSUFFICIENT_INFORMATION_ANSWER,
};
use docqa_core::{AppConfig, AppError, AppResult};
use docqa_llm::client_from_config;
use docqa_prompt::PromptSet;
use std::sync::Arc;
use tracing::Instrument;

/// Hybrid extractive/generative question answering over one document.
#[derive(Debug, Clone)]
pub struct QaPipeline {
    config: Arc<QaConfig>,
    aggregator: Aggregator,
    collaborator: Option<Collaborator>,
}

impl QaPipeline {
    /// Create a pipeline from explicit parts.
    ///
    /// `collaborator: None` disables refine, decompose and synthesize.
    pub fn new(
        config: QaConfig,
        scorer: Arc<dyn ExtractiveScorer>,
        collaborator: Option<Collaborator>,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            aggregator: Aggregator::new(scorer, Arc::clone(&config)),
            config,
            collaborator,
        }
    }

    /// Create a pipeline with the shared scorer and the configured provider.
    pub async fn from_config(app: &AppConfig, config: QaConfig) -> AppResult<Self> {
        config.validate()?;

        let scorer = shared_scorer(&config.scorer, config.max_answer_words).await?;

        let collaborator = match client_from_config(app)? {
            Some(client) => {
                let prompts = PromptSet::load(&app.workspace)?;
                Some(Collaborator::new(
                    client,
                    prompts,
                    config.collaborator_timeout_secs,
                ))
            }
            None => None,
        };

        Ok(Self::new(config, scorer, collaborator))
    }

    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    pub fn has_collaborator(&self) -> bool {
        self.collaborator.is_some()
    }

    /// Chunk `text` into a document.
    pub fn load_document(
        &self,
        source: impl Into<String>,
        text: impl Into<String>,
    ) -> AppResult<Document> {
        let source = source.into();
        let text = text.into();
        let chunks = chunker::chunk(&text, self.config.chunk_size, self.config.chunk_overlap)?;

        tracing::info!("Loaded document '{}' ({} chunks)", source, chunks.len());

        Ok(Document {
            source,
            text,
            chunks,
        })
    }

    /// Answer `question` against `document`.
    ///
    /// Only input errors are returned; every other failure degrades the
    /// answer and is reported in `FinalAnswer::warnings`.
    pub async fn resolve(
        &self,
        document: &Document,
        question: &str,
        mode: AnswerMode,
    ) -> AppResult<FinalAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyQuestion);
        }
        if document.chunks.is_empty() {
            return Err(AppError::EmptyDocument);
        }

        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("resolve", %request_id, %mode);

        async move {
            tracing::info!("Resolving question: {}", question);
            let mut warnings = Vec::new();

            let (text, supporting_evidence) = match mode {
                AnswerMode::Standard => {
                    let answer = self.aggregator.answer(question, &document.chunks).await;
                    (answer.expanded_sentence.clone(), vec![answer])
                }
                AnswerMode::Enhanced => {
                    let (text, answer) = self
                        .enhanced(question, &document.chunks, &mut warnings)
                        .await;
                    (text, vec![answer])
                }
                AnswerMode::Recursive => {
                    self.recursive(question, &document.chunks, &mut warnings)
                        .await
                }
            };

            if !warnings.is_empty() {
                tracing::warn!("Answer degraded: {} warning(s)", warnings.len());
            }

            Ok(FinalAnswer {
                text,
                supporting_evidence,
                mode,
                warnings,
            })
        }
        .instrument(span)
        .await
    }

    /// Up to `k` candidate answers, one per chunk, best first.
    pub async fn top_answers(
        &self,
        document: &Document,
        question: &str,
        k: usize,
    ) -> AppResult<Vec<AggregatedAnswer>> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyQuestion);
        }
        Ok(self
            .aggregator
            .top_answers(question, &document.chunks, k)
            .await)
    }

    async fn enhanced(
        &self,
        question: &str,
        chunks: &[Chunk],
        warnings: &mut Vec<PipelineWarning>,
    ) -> (String, AggregatedAnswer) {
        let answer = self.aggregator.answer(question, chunks).await;

        // Not-found answers are returned as-is.
        if answer.is_not_found() {
            return (answer.expanded_sentence.clone(), answer);
        }

        let Some(collaborator) = &self.collaborator else {
            push_warning(warnings, PipelineWarning::CollaboratorDisabled);
            return (answer.expanded_sentence.clone(), answer);
        };

        match refine(collaborator, question, &answer).await {
            Ok(text) => (text, answer),
            Err(e) => {
                tracing::warn!("Refinement failed, using extracted sentence: {}", e);
                push_warning(warnings, PipelineWarning::RefineFailed(e.to_string()));
                (answer.expanded_sentence.clone(), answer)
            }
        }
    }

    async fn recursive(
        &self,
        question: &str,
        chunks: &[Chunk],
        warnings: &mut Vec<PipelineWarning>,
    ) -> (String, Vec<AggregatedAnswer>) {
        let Some(collaborator) = &self.collaborator else {
            push_warning(warnings, PipelineWarning::CollaboratorDisabled);
            let (text, answer) = self.enhanced(question, chunks, warnings).await;
            return (text, vec![answer]);
        };

        let (sub_questions, warning) =
            decompose(collaborator, question, self.config.max_sub_questions).await;
        if let Some(warning) = warning {
            push_warning(warnings, warning);
        }

        if sub_questions.len() <= 1 {
            let (text, answer) = self.enhanced(question, chunks, warnings).await;
            return (text, vec![answer]);
        }

        // Sub-questions are answered in order, one at a time.
        let mut pairs: Vec<(SubQuestion, AggregatedAnswer)> =
            Vec::with_capacity(sub_questions.len());
        for sub in sub_questions {
            tracing::info!("Sub-question {}: {}", sub.order_index + 1, sub.text);
            let answer = self.aggregator.answer(&sub.text, chunks).await;
            pairs.push((sub, answer));
        }

        let evidence: Vec<AggregatedAnswer> = pairs.iter().map(|(_, a)| a.clone()).collect();

        if pairs.iter().all(|(_, a)| a.is_not_found()) {
            tracing::info!("No sub-question found an answer");
            return (INSUFFICIENT_INFORMATION_ANSWER.to_string(), evidence);
        }

        let synthesized = match synthesize(collaborator, question, &pairs).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Synthesis failed, concatenating sub-answers: {}", e);
                push_warning(warnings, PipelineWarning::SynthesisFailed(e.to_string()));
                return (concatenate(&pairs), evidence);
            }
        };

        let context = pairs
            .iter()
            .filter(|(_, a)| !a.is_not_found())
            .map(|(_, a)| a.expanded_sentence.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        match refine_text(collaborator, question, &synthesized, &context).await {
            Ok(text) => (text, evidence),
            Err(e) => {
                tracing::warn!("Final polish failed, using synthesized answer: {}", e);
                push_warning(warnings, PipelineWarning::RefineFailed(e.to_string()));
                (synthesized, evidence)
            }
        }
    }
}

fn push_warning(warnings: &mut Vec<PipelineWarning>, warning: PipelineWarning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}
