//! Data types for chunks, retrieval results, and answers.

use serde::{Deserialize, Serialize};

/// A bounded-size segment of the source corpus with its vector embedding.
///
/// Chunks are created in bulk from one corpus snapshot during ingestion and
/// are immutable afterwards; re-ingestion replaces the whole set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Stable identifier, unique within one corpus generation
    /// (`chunk_{ordinal}`).
    pub id: String,
    /// The trimmed, non-empty text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
}

/// One retrieved document paired with its L2 distance to the query vector.
///
/// Smaller distance means more similar. Retrieval results are ephemeral and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieved {
    /// The stored chunk text.
    pub text: String,
    /// Euclidean (L2) distance between the stored embedding and the query.
    pub distance: f32,
}

/// The result of one question, as returned to the boundary layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AskResult {
    /// The final text shown to the user. Either a grounded answer or the
    /// exact refusal sentence.
    pub answer: String,
    /// The concatenated context the answer was grounded on, or `None` when
    /// the question was refused.
    pub context_used: Option<String>,
    /// Similarity score in `[0, 1]` of the nearest retrieved chunk
    /// (0 when the store was empty). Higher means more similar.
    pub score: f32,
}
