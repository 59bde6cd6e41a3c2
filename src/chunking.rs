//! Corpus chunking.
//!
//! This module provides the [`Chunker`] trait and [`SentenceChunker`], which
//! splits raw text into bounded-size, sentence-aware segments suitable for
//! independent embedding and retrieval.

use crate::config::RagConfig;

/// A strategy for splitting a raw document into chunk texts.
///
/// Implementations return trimmed, non-empty substrings in document order.
/// Embeddings and identifiers are attached later by the ingestion pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunk texts.
    ///
    /// Returns an empty `Vec` for empty or whitespace-only input — that is
    /// a valid outcome, not an error.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Splits text into chunks of `min_chunk`–`max_chunk` characters, cutting at
/// sentence boundaries when possible.
///
/// Line endings are normalized (CRLF → LF) before splitting. The scanner
/// tentatively extends each window to `max_chunk` characters, then searches
/// backward (with one character of lookahead) for the last `.` or newline;
/// if that break point lies strictly more than `min_chunk` characters into
/// the window, the cut moves there instead of the hard boundary. A document
/// with no usable break points degrades to hard `max_chunk`-sized cuts.
///
/// Bounds are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point.
///
/// # Example
///
/// ```rust,ignore
/// use ragcore::SentenceChunker;
///
/// let chunker = SentenceChunker::new(300, 500);
/// let chunks = chunker.chunk(&corpus);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    min_chunk: usize,
    max_chunk: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker` with the given character bounds.
    ///
    /// Every chunk is at most `max_chunk` characters; every chunk except
    /// possibly the last is at least `min_chunk` characters.
    pub fn new(min_chunk: usize, max_chunk: usize) -> Self {
        Self { min_chunk, max_chunk }
    }

    /// Create a chunker using the bounds from a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.min_chunk, config.max_chunk)
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        let normalized = text.replace("\r\n", "\n");
        let chars: Vec<char> = normalized.trim().chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = (start + self.max_chunk).min(chars.len());
            if end < chars.len() {
                // Search includes one character of lookahead past the
                // tentative boundary.
                let window = &chars[start..=end];
                let break_at = window.iter().rposition(|c| *c == '.' || *c == '\n');
                if let Some(break_at) = break_at {
                    if break_at > self.min_chunk {
                        // The hard bound wins over a terminator sitting on
                        // the lookahead character itself.
                        end = (start + break_at + 1).min(start + self.max_chunk);
                    }
                }
            }
            let chunk: String = chars[start..end].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            start = end;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_input_yield_no_chunks() {
        let chunker = SentenceChunker::new(300, 500);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\t  \r\n ").is_empty());
    }

    #[test]
    fn short_document_yields_exactly_one_chunk() {
        let chunker = SentenceChunker::new(300, 500);
        let chunks = chunker.chunk("The sky is blue. Water is wet.");
        assert_eq!(chunks, vec!["The sky is blue. Water is wet.".to_string()]);
    }

    #[test]
    fn cuts_at_sentence_boundary_past_min() {
        let chunker = SentenceChunker::new(10, 40);
        // First sentence terminator sits well past min_chunk.
        let text = "A first short sentence. And then a second sentence that keeps going.";
        let chunks = chunker.chunk(text);
        assert_eq!(chunks[0], "A first short sentence.");
    }

    #[test]
    fn unbreakable_text_degrades_to_hard_cuts() {
        let chunker = SentenceChunker::new(10, 25);
        let text = "x".repeat(70);
        let chunks = chunker.chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 25);
        assert_eq!(chunks[1].chars().count(), 25);
        assert_eq!(chunks[2].chars().count(), 20);
    }

    #[test]
    fn crlf_is_normalized_before_splitting() {
        let chunker = SentenceChunker::new(5, 20);
        let chunks = chunker.chunk("first line\r\nsecond line here now");
        assert!(chunks.iter().all(|c| !c.contains('\r')));
    }

    #[test]
    fn multibyte_text_is_split_on_character_bounds() {
        let chunker = SentenceChunker::new(3, 10);
        let text = "ééééééééééééééééééééééééé";
        let chunks = chunker.chunk(text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }
}
