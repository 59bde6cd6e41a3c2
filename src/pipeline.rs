//! Corpus ingestion pipeline.
//!
//! [`IngestPipeline`] drives chunking → batch embedding → store population,
//! replacing any prior store contents wholesale.

use std::sync::Arc;

use tracing::info;

use crate::chunking::Chunker;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Populates the vector store from one corpus document.
///
/// Collaborators are injected explicitly; the pipeline holds no ambient
/// defaults. Ingestion is not safe to run concurrently with another
/// ingestion or with in-flight questions — the store mutation is not
/// serialized here, that is the operator's contract.
pub struct IngestPipeline {
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl IngestPipeline {
    /// Create a new pipeline from its collaborators.
    pub fn new(
        chunker: Arc<dyn Chunker>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { chunker, embedder, store }
    }

    /// Ingest one document, replacing the store's previous contents.
    ///
    /// Chunks the text, embeds all chunks in one batch call, assigns each
    /// chunk a positional id (`chunk_{i}`), resets the store, and inserts
    /// everything in one call. Returns the stored record count.
    ///
    /// Zero chunks (empty or whitespace-only input) stops before touching
    /// the store, preserving existing data, and returns 0. Embedding runs
    /// *before* the reset, so an embedding failure also leaves the prior
    /// store intact; a failure after the reset requires a full re-run.
    ///
    /// # Errors
    ///
    /// Propagates embedding and store failures unchanged.
    pub async fn ingest(&self, text: &str) -> Result<usize> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            info!(chunk_count = 0, "no text to ingest, store left untouched");
            return Ok(0);
        }

        info!(chunk_count = chunks.len(), "chunked document, generating embeddings");

        let texts: Vec<&str> = chunks.iter().map(|c| c.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let ids: Vec<String> = (0..chunks.len()).map(|i| format!("chunk_{i}")).collect();

        self.store.reset().await?;
        self.store.add(&ids, &chunks, &embeddings).await?;

        let count = self.store.count().await?;
        info!(stored_count = count, "ingestion complete");
        Ok(count)
    }
}
