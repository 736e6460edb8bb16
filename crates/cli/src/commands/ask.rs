//! Ask command handler.
//!
//! Answers a single question about a document file.

use super::{build_pipeline, confidence_label, report_warnings, to_json};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_engine::{parser, AnswerMode};
use std::path::PathBuf;

/// Ask one question about a document
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Document to read (text, markdown or HTML)
    pub file: PathBuf,

    /// The question to ask
    pub question: String,

    /// Answer mode (standard, enhanced, recursive)
    #[arg(long, default_value = "standard")]
    pub mode: AnswerMode,

    /// Also list the N best candidate spans
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Hide the confidence line
    #[arg(long)]
    pub no_confidence: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let pipeline = build_pipeline(config).await?;

        let text = parser::parse_file(&self.file)?;
        let source = self.file.display().to_string();
        let document = pipeline.load_document(source, text)?;

        let answer = pipeline
            .resolve(&document, &self.question, self.mode)
            .await?;

        let candidates = match self.top_k {
            Some(k) if k > 0 => pipeline.top_answers(&document, &self.question, k).await?,
            _ => Vec::new(),
        };

        if self.json {
            let output = serde_json::json!({
                "question": self.question.trim(),
                "document": document.source,
                "chunks": document.chunks.len(),
                "answer": answer,
                "candidates": candidates,
            });
            println!("{}", to_json(&output)?);
            return Ok(());
        }

        println!("{}", answer.text);
        if !self.no_confidence {
            println!("{}", confidence_label(answer.top_score(), answer.confidence()));
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            for evidence in &answer.supporting_evidence {
                tracing::debug!(
                    "Evidence: '{}' score={:.3} confidence={} chunk={:?}",
                    evidence.raw_span,
                    evidence.score,
                    evidence.confidence,
                    evidence.source_chunk_index
                );
            }
        }

        if !candidates.is_empty() {
            println!();
            println!("Top candidates:");
            for (i, candidate) in candidates.iter().enumerate() {
                println!(
                    "  {}. {} (score: {:.3}, {} confidence)",
                    i + 1,
                    candidate.expanded_sentence,
                    candidate.score,
                    candidate.confidence
                );
            }
        }

        report_warnings(&answer);

        Ok(())
    }
}
