//! Answer pipeline tuning.
//!
//! Loaded from `.docqa/qa.yaml` when present. Every field has a default, so a
//! partial file only overrides what it names.

use docqa_core::config::STATE_DIR;
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which extractive scorer backs the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Built-in keyword-anchored scorer
    #[default]
    Lexical,
    /// Extractive QA model served over HTTP
    Http,
}

/// Extractive scorer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default)]
    pub kind: ScorerKind,

    /// Inference endpoint, required for `http`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_scorer_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            kind: ScorerKind::default(),
            endpoint: None,
            timeout_secs: default_scorer_timeout_secs(),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Chunk budget in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by adjacent chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Concurrent chunk scorings per question
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,

    /// Longest extracted span, in words
    #[serde(default = "default_max_answer_words")]
    pub max_answer_words: usize,

    /// Spans with at most this many words are expanded to their sentence
    #[serde(default = "default_expand_below_words")]
    pub expand_below_words: usize,

    /// Spans must score above this to be expanded
    #[serde(default = "default_min_expand_score")]
    pub min_expand_score: f32,

    #[serde(default = "default_sentence_delimiters")]
    pub sentence_delimiters: Vec<char>,

    /// Expansion limit per side, in bytes
    #[serde(default = "default_max_expansion_chars")]
    pub max_expansion_chars: usize,

    #[serde(default = "default_high_confidence")]
    pub high_confidence: f32,

    #[serde(default = "default_medium_confidence")]
    pub medium_confidence: f32,

    #[serde(default = "default_max_sub_questions")]
    pub max_sub_questions: usize,

    /// Deadline for each collaborator call
    #[serde(default = "default_collaborator_timeout_secs")]
    pub collaborator_timeout_secs: u64,

    #[serde(default)]
    pub scorer: ScorerConfig,
}

fn default_chunk_size() -> usize {
    2500
}

fn default_chunk_overlap() -> usize {
    300
}

fn default_worker_pool_size() -> usize {
    4
}

fn default_max_answer_words() -> usize {
    100
}

fn default_expand_below_words() -> usize {
    15
}

fn default_min_expand_score() -> f32 {
    0.05
}

fn default_sentence_delimiters() -> Vec<char> {
    vec!['.', '!', '?']
}

fn default_max_expansion_chars() -> usize {
    400
}

fn default_high_confidence() -> f32 {
    0.7
}

fn default_medium_confidence() -> f32 {
    0.3
}

fn default_max_sub_questions() -> usize {
    4
}

fn default_collaborator_timeout_secs() -> u64 {
    docqa_core::config::DEFAULT_TIMEOUT_SECS
}

fn default_scorer_timeout_secs() -> u64 {
    30
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            worker_pool_size: default_worker_pool_size(),
            max_answer_words: default_max_answer_words(),
            expand_below_words: default_expand_below_words(),
            min_expand_score: default_min_expand_score(),
            sentence_delimiters: default_sentence_delimiters(),
            max_expansion_chars: default_max_expansion_chars(),
            high_confidence: default_high_confidence(),
            medium_confidence: default_medium_confidence(),
            max_sub_questions: default_max_sub_questions(),
            collaborator_timeout_secs: default_collaborator_timeout_secs(),
            scorer: ScorerConfig::default(),
        }
    }
}

impl QaConfig {
    /// Load from `<workspace>/.docqa/qa.yaml`, or defaults if the file is absent.
    pub fn load(workspace: &Path) -> AppResult<Self> {
        let path = config_path(workspace);

        let config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                AppError::Config(format!("Failed to read {:?}: {}", path, e))
            })?;
            let config: QaConfig = serde_yaml::from_str(&content).map_err(|e| {
                AppError::Config(format!("Failed to parse {:?}: {}", path, e))
            })?;
            tracing::debug!("Loaded pipeline config from {:?}", path);
            config
        } else {
            tracing::debug!("No pipeline config at {:?}, using defaults", path);
            QaConfig::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_overlap == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap must be in 1..{} (got {})",
                self.chunk_size, self.chunk_overlap
            )));
        }

        if self.worker_pool_size == 0 {
            return Err(AppError::Config(
                "worker_pool_size must be at least 1".to_string(),
            ));
        }

        if self.max_answer_words == 0 {
            return Err(AppError::Config(
                "max_answer_words must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.medium_confidence)
            || !(0.0..=1.0).contains(&self.high_confidence)
            || self.medium_confidence > self.high_confidence
        {
            return Err(AppError::Config(format!(
                "Confidence thresholds must satisfy 0 <= medium <= high <= 1 (got {} / {})",
                self.medium_confidence, self.high_confidence
            )));
        }

        if self.sentence_delimiters.is_empty() {
            return Err(AppError::Config(
                "sentence_delimiters cannot be empty".to_string(),
            ));
        }

        if self.max_sub_questions == 0 {
            return Err(AppError::Config(
                "max_sub_questions must be at least 1".to_string(),
            ));
        }

        if self.collaborator_timeout_secs == 0 || self.scorer.timeout_secs == 0 {
            return Err(AppError::Config("Timeouts must be positive".to_string()));
        }

        if self.scorer.kind == ScorerKind::Http && self.scorer.endpoint.is_none() {
            return Err(AppError::Config(
                "scorer.endpoint is required for the http scorer".to_string(),
            ));
        }

        Ok(())
    }
}

/// Path of the pipeline config file.
pub fn config_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR).join("qa.yaml")
}
