//! Interactive document session.

use crate::parser;
use crate::pipeline::QaPipeline;
use crate::types::{AnswerMode, Document, FinalAnswer, HistoryEntry};
use chrono::Utc;
use docqa_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;

/// One active document plus the questions asked about it.
///
/// History lives in memory only and is cleared whenever a new document is
/// loaded.
#[derive(Debug)]
pub struct DocumentSession {
    pipeline: Arc<QaPipeline>,
    document: Option<Arc<Document>>,
    history: Vec<HistoryEntry>,
}

impl DocumentSession {
    pub fn new(pipeline: Arc<QaPipeline>) -> Self {
        Self {
            pipeline,
            document: None,
            history: Vec::new(),
        }
    }

    pub fn pipeline(&self) -> &QaPipeline {
        &self.pipeline
    }

    pub fn document(&self) -> Option<&Arc<Document>> {
        self.document.as_ref()
    }

    /// Replace the active document with `text`.
    pub fn load_text(
        &mut self,
        source: impl Into<String>,
        text: impl Into<String>,
    ) -> AppResult<Arc<Document>> {
        let document = Arc::new(self.pipeline.load_document(source, text)?);
        self.document = Some(Arc::clone(&document));
        self.history.clear();
        Ok(document)
    }

    /// Parse and load a document file.
    pub fn load_file(&mut self, path: &Path) -> AppResult<Arc<Document>> {
        let text = parser::parse_file(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_text(source, text)
    }

    /// Answer against the active document and record the exchange.
    pub async fn resolve(&mut self, question: &str, mode: AnswerMode) -> AppResult<FinalAnswer> {
        let document = self.document.clone().ok_or(AppError::NoDocumentLoaded)?;
        let answer = self.pipeline.resolve(&document, question, mode).await?;

        self.history.push(HistoryEntry {
            question: question.trim().to_string(),
            answer: answer.text.clone(),
            score: answer.top_score(),
            confidence: answer.confidence(),
            mode,
            asked_at: Utc::now(),
        });

        Ok(answer)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
