//! In-memory vector store using exact L2 distance.
//!
//! This module provides [`InMemoryVectorStore`], a zero-dependency store
//! backed by a `Vec` protected by a `tokio::sync::RwLock`. It is suitable
//! for development, testing, and small corpora.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, Retrieved};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`] with exact Euclidean distance search.
///
/// All operations are async-safe via `tokio::sync::RwLock`. Records are
/// appended in insertion order and scanned linearly on query.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Vec<Chunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute the Euclidean (L2) distance between two vectors.
///
/// Dimensions beyond the shorter vector are ignored; uniform dimensions are
/// the ingestion pipeline's invariant to uphold.
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(
        &self,
        ids: &[String],
        documents: &[String],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if ids.len() != documents.len() || ids.len() != embeddings.len() {
            return Err(RagError::Validation(format!(
                "parallel arrays disagree: {} ids, {} documents, {} embeddings",
                ids.len(),
                documents.len(),
                embeddings.len()
            )));
        }

        let mut records = self.records.write().await;
        for ((id, text), embedding) in ids.iter().zip(documents).zip(embeddings) {
            records.push(Chunk {
                id: id.clone(),
                text: text.clone(),
                embedding: embedding.clone(),
            });
        }
        Ok(())
    }

    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<Retrieved>> {
        let records = self.records.read().await;

        let mut scored: Vec<Retrieved> = records
            .iter()
            .map(|chunk| Retrieved {
                text: chunk.text.clone(),
                distance: l2_distance(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(n_results);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }

    async fn reset(&self) -> Result<()> {
        self.records.write().await.clear();
        Ok(())
    }
}
