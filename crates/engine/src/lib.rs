//! Document question answering engine.
//!
//! Chunks a document, scores every chunk with an extractive scorer, picks
//! and expands the best span, and optionally involves a generation
//! collaborator to refine answers or to decompose a question and synthesize
//! its parts.
//!
//! # Example
//! ```no_run
//! use docqa_engine::{AnswerMode, QaConfig, QaPipeline};
//! use docqa_engine::scorer::LexicalScorer;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = QaPipeline::new(QaConfig::default(), Arc::new(LexicalScorer::new(100)), None);
//! let document = pipeline.load_document("notes", "Paris is the capital of France.")?;
//! let answer = pipeline
//!     .resolve(&document, "What is the capital of France?", AnswerMode::Standard)
//!     .await?;
//! println!("{}", answer.text);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod chunker;
pub mod collaborator;
pub mod config;
pub mod decomposer;
pub mod expand;
pub mod extractor;
pub mod parser;
pub mod pipeline;
pub mod refiner;
pub mod scorer;
pub mod session;
pub mod synthesizer;
pub mod types;

// Re-export commonly used types
pub use collaborator::Collaborator;
pub use config::{QaConfig, ScorerConfig, ScorerKind};
pub use pipeline::QaPipeline;
pub use scorer::{shared_scorer, ExtractiveScorer, ScoredSpan};
pub use session::DocumentSession;
pub use types::{
    AggregatedAnswer, AnswerMode, Chunk, Confidence, Document, ExtractionResult, FinalAnswer,
    HistoryEntry, PipelineWarning, SubQuestion, INSUFFICIENT_INFORMATION_ANSWER,
    NOT_FOUND_ANSWER,
};
