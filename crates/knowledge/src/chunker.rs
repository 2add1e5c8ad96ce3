//! Deterministic sliding-window text chunking.
//!
//! Boundaries depend only on the input text and the (size, overlap)
//! parameters, so chunking is reproducible across runs. Sizes are measured
//! in characters, not bytes, so multi-byte text never splits mid-character.

use crate::types::ChunkCandidate;

/// Split text into overlapping chunks.
///
/// Consecutive chunks overlap by exactly `overlap` characters, except the
/// last chunk which may overlap more when the remainder is short. Every
/// chunk is at most `chunk_size` characters. The union of chunks covers
/// the source text in order.
pub fn chunk_text(
    source_id: &str,
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Vec<ChunkCandidate> {
    if text.is_empty() || chunk_size == 0 {
        return vec![];
    }

    // Degenerate overlap falls back to non-overlapping windows
    let step = if overlap < chunk_size {
        chunk_size - overlap
    } else {
        chunk_size
    };

    // Character-indexed view; boundaries[i] is the byte offset of char i
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_count = boundaries.len();
    boundaries.push(text.len());

    let mut chunks = Vec::new();
    let mut position = 0u32;
    let mut start = 0usize;

    loop {
        let end = (start + chunk_size).min(char_count);
        let chunk_text = &text[boundaries[start]..boundaries[end]];

        chunks.push(ChunkCandidate {
            source_id: source_id.to_string(),
            position,
            start_offset: start,
            text: chunk_text.to_string(),
            metadata: serde_json::json!({
                "start": start,
                "end": end,
            }),
        });

        position += 1;

        if end == char_count {
            break;
        }
        start += step;
    }

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}
