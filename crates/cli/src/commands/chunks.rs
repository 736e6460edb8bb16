//! Chunks command handler.

use super::to_json;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_engine::{chunker, parser, QaConfig};
use std::path::PathBuf;

const PREVIEW_CHARS: usize = 60;

/// Show how a document is split into chunks
#[derive(Args, Debug)]
pub struct ChunksCommand {
    /// Document to read (text, markdown or HTML)
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChunksCommand {
    /// Execute the chunks command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let qa_config = QaConfig::load(&config.workspace)?;
        let text = parser::parse_file(&self.file)?;
        let chunks = chunker::chunk(&text, qa_config.chunk_size, qa_config.chunk_overlap)?;

        tracing::debug!(
            "chunk_size={} overlap={} chunks={}",
            qa_config.chunk_size,
            qa_config.chunk_overlap,
            chunks.len()
        );

        if self.json {
            println!("{}", to_json(&chunks)?);
            return Ok(());
        }

        println!(
            "{}: {} characters, {} chunks (size {}, overlap {})",
            self.file.display(),
            text.chars().count(),
            chunks.len(),
            qa_config.chunk_size,
            qa_config.chunk_overlap
        );
        for chunk in &chunks {
            println!(
                "#{:<4} {:>8}..{:<8} {}",
                chunk.index,
                chunk.start_offset,
                chunk.end_offset,
                preview(&chunk.text)
            );
        }

        Ok(())
    }
}

fn preview(text: &str) -> String {
    let flat: String = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut)
}
