//! Vector store trait for storing and searching chunk embeddings.

use async_trait::async_trait;

use crate::document::Retrieved;
use crate::error::Result;

/// A storage backend for (id, text, embedding) records with nearest-neighbor
/// search.
///
/// The store holds one corpus generation at a time: ingestion calls
/// [`reset`](VectorStore::reset) and repopulates wholesale, there is no
/// incremental deletion. Distances are Euclidean (L2); smaller means more
/// similar.
///
/// # Example
///
/// ```rust,ignore
/// use ragcore::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.add(&ids, &texts, &embeddings).await?;
/// let nearest = store.query(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append records given as parallel slices of equal length, ids unique.
    ///
    /// Does not deduplicate.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`](crate::RagError::Validation) if the
    /// slice lengths disagree.
    async fn add(&self, ids: &[String], documents: &[String], embeddings: &[Vec<f32>])
    -> Result<()>;

    /// Return the `n_results` records nearest to `embedding`, ordered by
    /// ascending distance.
    ///
    /// An empty store yields an empty list, not an error.
    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<Retrieved>>;

    /// Return the number of stored records.
    async fn count(&self) -> Result<usize>;

    /// Discard all records and recreate an empty store.
    ///
    /// Idempotent: resetting a store that holds nothing (or was never
    /// created) succeeds.
    async fn reset(&self) -> Result<()>;
}
