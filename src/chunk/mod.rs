//! Text chunking
//!
//! Splits extracted text into bounded, overlapping segments for embedding.
//! Cuts prefer paragraph breaks, then sentence breaks, then raw length, and
//! never exceed the configured maximum. Each chunk records how many
//! characters it shares with its predecessor, so concatenating the chunks
//! minus their recorded overlaps reconstructs the input exactly.
//!
//! Splitting is deterministic: identical text and parameters always produce
//! identical boundaries.

mod boundaries;

use crate::config::ChunkConfig;
use boundaries::{last_break, BreakPriority};
use serde::{Deserialize, Serialize};

/// A bounded-length slice of a source's text. Immutable once created;
/// persisted only as an embedded vector plus payload in the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Ordinal position within the source
    pub position: usize,
    /// Characters shared with the end of the previous chunk
    pub overlap: usize,
}

/// Split `text` into chunks of at most `config.max_chars` characters with
/// `config.overlap_chars` of carry-over between neighbors.
///
/// Boundary-preferring cuts only apply in the back half of the window, so a
/// stray early newline cannot produce a degenerate chunk.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Vec::new();
    }

    let max = config.max_chars.max(1);
    let overlap = config.overlap_chars.min(max.saturating_sub(1));

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut carried = 0;

    loop {
        let hard_end = (start + max).min(total);
        let end = if hard_end == total {
            total
        } else {
            find_cut(&chars, start, hard_end)
        };

        chunks.push(Chunk {
            text: chars[start..end].iter().collect(),
            position: chunks.len(),
            overlap: carried,
        });

        if end == total {
            break;
        }

        // Step back by the overlap, but always advance by at least one char.
        let next = end.saturating_sub(overlap).max(start + 1);
        carried = end - next;
        start = next;
    }

    chunks
}

fn find_cut(chars: &[char], start: usize, hard_end: usize) -> usize {
    let floor = start + (hard_end - start) / 2;
    last_break(chars, floor, hard_end, BreakPriority::Paragraph)
        .or_else(|| last_break(chars, floor, hard_end, BreakPriority::Sentence))
        .unwrap_or(hard_end)
}

/// Undo the overlap: concatenate chunks, dropping each chunk's carried
/// prefix. Inverse of [`split_text`] by construction.
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.extend(chunk.text.chars().skip(chunk.overlap));
    }
    out
}
