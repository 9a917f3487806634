//! Overlapping sliding-window text chunker.
//!
//! Splits extracted document text into [`DocumentChunk`]s of at most
//! `max_chars` characters, carrying `overlap` characters between
//! consecutive chunks so answers spanning a chunk boundary stay
//! retrievable. Windows break at the last whitespace inside the limit
//! when one exists.

use crate::models::DocumentChunk;

/// Split text into overlapping chunks of at most `max_chars` characters.
///
/// Guarantees: no empty chunks, source order preserved, strictly
/// increasing offsets. `overlap` must be smaller than `max_chars`
/// (enforced by config validation).
pub fn split_text(text: &str, max_chars: usize, overlap: usize) -> Vec<DocumentChunk> {
    // Byte offset of every char, so windows never split a code point.
    let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total = char_starts.len();
    let byte_at = |ci: usize| -> usize {
        if ci < total {
            char_starts[ci]
        } else {
            text.len()
        }
    };

    let mut chunks: Vec<DocumentChunk> = Vec::new();
    let mut start = 0usize; // char index

    while start < total {
        let mut end = (start + max_chars).min(total);

        // Break at the last whitespace inside the window, unless this
        // window already reaches the end of the text.
        if end < total {
            let window = &text[byte_at(start)..byte_at(end)];
            if let Some(ws_byte) = window.rfind(char::is_whitespace) {
                let ws_chars = window[..ws_byte].chars().count();
                let candidate = start + ws_chars + 1;
                if candidate > start {
                    end = candidate;
                }
            }
        }

        let raw = &text[byte_at(start)..byte_at(end)];
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let lead = raw.len() - raw.trim_start().len();
            let offset = byte_at(start) + lead;
            match chunks.last_mut() {
                // A window pulled back into trimmed whitespace re-starts
                // at the same word; this one reaches at least as far, so
                // it supersedes the previous chunk.
                Some(prev) if prev.offset == offset => prev.text = trimmed.to_string(),
                _ => chunks.push(DocumentChunk {
                    text: trimmed.to_string(),
                    offset,
                }),
            }
        }

        if end >= total {
            break;
        }
        // Step back by the overlap, but always make forward progress.
        start = end.saturating_sub(overlap).max(start + 1);
    }

    chunks
}
