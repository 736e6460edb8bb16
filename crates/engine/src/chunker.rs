//! Fixed-size chunking with overlap.

use crate::types::Chunk;
use docqa_core::{AppError, AppResult};

/// Split text into overlapping chunks of at most `chunk_size` characters.
///
/// Consecutive chunks share exactly `overlap` characters, so any sentence of
/// up to `overlap` characters lies entirely within at least one chunk.
/// Offsets are byte offsets into `text`. Chunk text is never trimmed:
/// `chunk.text` is always `text[chunk.start_offset..chunk.end_offset]`.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<Chunk>> {
    if overlap == 0 || overlap >= chunk_size {
        return Err(AppError::Config(format!(
            "Chunk overlap must be in 1..{} (got {})",
            chunk_size, overlap
        )));
    }

    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }

    // Byte offset of every character start, plus the end of text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(char_count);
        let (start_offset, end_offset) = (bounds[start], bounds[end]);

        chunks.push(Chunk {
            index: chunks.len(),
            text: text[start_offset..end_offset].to_string(),
            start_offset,
            end_offset,
        });

        if end == char_count {
            break;
        }

        // end - start == chunk_size > overlap here, so start always advances.
        start = end - overlap;
    }

    tracing::debug!(
        "Chunked {} characters into {} chunks (size: {}, overlap: {})",
        char_count,
        chunks.len(),
        chunk_size,
        overlap
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covering(text: &str, chunks: &[Chunk], overlap: usize) {
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks.last().unwrap().end_offset, text.len());

        for chunk in chunks {
            assert_eq!(chunk.text, &text[chunk.start_offset..chunk.end_offset]);
        }

        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset > pair[0].start_offset);
            assert!(pair[1].start_offset < pair[0].end_offset, "chunks must overlap");
            assert!(pair[0].end_offset - pair[1].start_offset >= overlap);
        }
    }

    #[test]
    fn test_short_document_single_chunk() {
        let text = "Paris is the capital of France. It is known for the Eiffel Tower.";
        let chunks = chunk(text, 2500, 300).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_coverage_and_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz".repeat(40);
        let chunks = chunk(&text, 100, 20).unwrap();

        assert!(chunks.len() > 1);
        assert_covering(&text, &chunks, 20);
        assert_eq!(chunks[1].start_offset, 80);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "héllo wörld ünïcødé ".repeat(30);
        let chunks = chunk(&text, 37, 9).unwrap();
        assert_covering(&text, &chunks, 9);
    }

    #[test]
    fn test_sentence_within_overlap_is_contained() {
        let sentence = "Vault code is 4471.";
        for offset in 0..200 {
            let text = format!("{}{}{}", "x".repeat(offset), sentence, "y".repeat(200));
            let chunks = chunk(&text, 100, 20).unwrap();
            assert!(
                chunks.iter().any(|c| c.text.contains(sentence)),
                "sentence split at offset {}",
                offset
            );
        }
    }

    #[test]
    fn test_budget_counts_characters() {
        let text = "😀".repeat(12);
        let chunks = chunk(&text, 5, 4).unwrap();

        assert_covering(&text, &chunks, 4);
        for c in &chunks {
            assert!(c.text.chars().count() <= 5);
        }
        for pair in chunks.windows(2) {
            let shared = &text[pair[1].start_offset..pair[0].end_offset];
            assert_eq!(shared.chars().count(), 4);
        }
        assert_eq!(chunks.len(), 8);
    }

    #[test]
    fn test_idempotent() {
        let text = "Some sentence here. ".repeat(500);
        let a = chunk(&text, 2500, 300).unwrap();
        let b = chunk(&text, 2500, 300).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(chunk("", 100, 10), Err(AppError::EmptyDocument)));
        assert!(matches!(chunk(" \n\t ", 100, 10), Err(AppError::EmptyDocument)));
    }

    #[test]
    fn test_invalid_overlap() {
        assert!(matches!(chunk("text", 100, 0), Err(AppError::Config(_))));
        assert!(matches!(chunk("text", 100, 100), Err(AppError::Config(_))));
    }
}
