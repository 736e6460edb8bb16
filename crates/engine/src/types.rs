//! Answer pipeline type definitions.

use chrono::{DateTime, Utc};
use docqa_core::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Answer text used when no chunk scored above zero.
pub const NOT_FOUND_ANSWER: &str = "Could not find an answer in the document.";

/// Answer text used when every sub-question came back not found.
pub const INSUFFICIENT_INFORMATION_ANSWER: &str =
    "I couldn't find sufficient information to answer this question.";

/// An overlapping segment of the loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position within the document, starting at 0
    pub index: usize,

    /// Chunk text, exactly `document[start_offset..end_offset]`
    pub text: String,

    /// Byte offset of the first character in the document
    pub start_offset: usize,

    /// Byte offset one past the last character
    pub end_offset: usize,
}

/// The active document and its chunks.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Display name (file name or caller-supplied label)
    pub source: String,

    /// Full document text
    pub text: String,

    /// Ordered chunks covering `text`
    pub chunks: Vec<Chunk>,
}

/// Result of scoring one (question, chunk) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub chunk_index: usize,
    pub answer_span: String,
    pub score: f32,
    /// Byte offset of the span inside the chunk text
    pub span_start: usize,
    pub span_end: usize,
}

impl ExtractionResult {
    /// Zero-score result for a chunk whose scoring failed.
    pub fn empty(chunk_index: usize) -> Self {
        Self {
            chunk_index,
            answer_span: String::new(),
            score: 0.0,
            span_start: 0,
            span_end: 0,
        }
    }
}

/// Confidence band derived from the winning score.
///
/// Variants are ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best answer for one question across all chunks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedAnswer {
    pub raw_span: String,
    pub expanded_sentence: String,
    pub score: f32,
    pub confidence: Confidence,
    /// `None` marks the not-found sentinel
    pub source_chunk_index: Option<usize>,
}

impl AggregatedAnswer {
    /// Sentinel returned when nothing in the document matched.
    pub fn not_found() -> Self {
        Self {
            raw_span: NOT_FOUND_ANSWER.to_string(),
            expanded_sentence: NOT_FOUND_ANSWER.to_string(),
            score: 0.0,
            confidence: Confidence::Low,
            source_chunk_index: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.source_chunk_index.is_none()
    }
}

/// One step of a decomposed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub text: String,
    pub order_index: usize,
}

impl SubQuestion {
    pub fn new(text: impl Into<String>, order_index: usize) -> Self {
        Self {
            text: text.into(),
            order_index,
        }
    }
}

/// How much of the pipeline runs for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Extractive answer only
    #[default]
    Standard,
    /// Extractive answer rewritten by the collaborator
    Enhanced,
    /// Decompose, answer each part, synthesize, refine
    Recursive,
}

impl AnswerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Enhanced => "enhanced",
            Self::Recursive => "recursive",
        }
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "enhanced" | "enhance" => Ok(Self::Enhanced),
            "recursive" | "rlm" => Ok(Self::Recursive),
            other => Err(AppError::Config(format!(
                "Unknown answer mode: '{}'. Expected standard, enhanced or recursive",
                other
            ))),
        }
    }
}

/// Recoverable degradation recorded while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// No credential for the generation collaborator
    CollaboratorDisabled,
    RefineFailed(String),
    DecomposeFailed(String),
    SynthesisFailed(String),
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollaboratorDisabled => {
                write!(f, "generation collaborator not configured; answer is unrefined")
            }
            Self::RefineFailed(msg) => write!(f, "refinement failed: {}", msg),
            Self::DecomposeFailed(msg) => write!(f, "decomposition failed: {}", msg),
            Self::SynthesisFailed(msg) => write!(f, "synthesis failed: {}", msg),
        }
    }
}

/// Terminal artifact returned for one question.
#[derive(Debug, Clone, Serialize)]
pub struct FinalAnswer {
    pub text: String,
    pub supporting_evidence: Vec<AggregatedAnswer>,
    pub mode: AnswerMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PipelineWarning>,
}

impl FinalAnswer {
    /// True when any stage fell back.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Highest evidence score, 0 when there is no evidence.
    pub fn top_score(&self) -> f32 {
        self.top_evidence().map_or(0.0, |e| e.score)
    }

    /// Highest-scoring evidence; the first wins ties.
    pub fn top_evidence(&self) -> Option<&AggregatedAnswer> {
        self.supporting_evidence
            .iter()
            .reduce(|best, e| if e.score > best.score { e } else { best })
    }

    /// Confidence of the top evidence, `Low` when there is none.
    pub fn confidence(&self) -> Confidence {
        self.top_evidence().map_or(Confidence::Low, |e| e.confidence)
    }
}

/// One question/answer exchange of an interactive session.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub score: f32,
    pub confidence: Confidence,
    pub mode: AnswerMode,
    pub asked_at: DateTime<Utc>,
}
