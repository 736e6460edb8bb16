//! Error types for docqa.
//!
//! A single error enum covers every category the pipeline distinguishes:
//! input errors that reach the caller, scorer errors that the extractive
//! resolver absorbs, and collaborator errors that the refine/decompose/
//! synthesize stages turn into fallbacks.

use thiserror::Error;

/// Unified error type for docqa.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document produced no text after parsing
    #[error("Document is empty")]
    EmptyDocument,

    /// A question was asked before any document was loaded
    #[error("No document loaded")]
    NoDocumentLoaded,

    /// The question was empty or whitespace
    #[error("Please provide a question")]
    EmptyQuestion,

    /// The document format has no parser
    #[error("Unsupported document format: {0}")]
    UnsupportedDocument(String),

    /// Extractive scorer failures (model load, malformed input)
    #[error("Scorer error: {0}")]
    Scorer(String),

    /// Cloud generation collaborator failures (transport, HTTP status, parsing)
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Collaborator quota or rate limit exhausted
    #[error("Collaborator rate limited: {0}")]
    RateLimited(String),

    /// Collaborator call exceeded its deadline
    #[error("Collaborator timed out after {0}s")]
    CollaboratorTimeout(u64),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Input errors are fatal to the current request and reported as-is.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::EmptyDocument
                | AppError::NoDocumentLoaded
                | AppError::EmptyQuestion
                | AppError::UnsupportedDocument(_)
        )
    }

    /// Collaborator errors are recoverable; callers fall back instead of failing.
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            AppError::Collaborator(_) | AppError::RateLimited(_) | AppError::CollaboratorTimeout(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
