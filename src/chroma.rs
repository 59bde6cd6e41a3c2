//! Chroma vector database client.
//!
//! Speaks the Chroma REST API: get-or-create collection, bulk add, query by
//! embedding, count, and delete-collection. Distances come back as L2.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::document::Retrieved;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The default Chroma server URL.
const DEFAULT_URL: &str = "http://localhost:8000";

/// The default collection name.
const DEFAULT_COLLECTION: &str = "rag_docs";

/// Per-request timeout for store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`VectorStore`] backed by a remote Chroma instance.
///
/// The collection is created on first use and its id cached; [`reset`]
/// deletes the collection (tolerating absence) and recreates it empty.
///
/// [`reset`]: VectorStore::reset
///
/// # Example
///
/// ```rust,ignore
/// use ragcore::ChromaVectorStore;
///
/// let store = ChromaVectorStore::new()?
///     .with_url("http://localhost:8000")
///     .with_collection("rag_docs");
/// let n = store.count().await?;
/// ```
pub struct ChromaVectorStore {
    client: reqwest::Client,
    url: String,
    collection: String,
    /// Cached collection id; invalidated by `reset`.
    collection_id: RwLock<Option<String>>,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: &'a [String],
    documents: &'a [String],
    embeddings: &'a [Vec<f32>],
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<String>>,
    #[serde(default)]
    distances: Vec<Vec<f32>>,
}

impl ChromaVectorStore {
    /// Create a new client with the default URL and collection name.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Transport`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client =
            reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
                RagError::Transport {
                    call: "vector store",
                    message: format!("failed to build HTTP client: {e}"),
                }
            })?;

        Ok(Self {
            client,
            url: DEFAULT_URL.into(),
            collection: DEFAULT_COLLECTION.into(),
            collection_id: RwLock::new(None),
        })
    }

    /// Set the Chroma server URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Get or create the collection, returning its id (cached after the
    /// first call).
    async fn collection_id(&self) -> Result<String> {
        if let Some(id) = self.collection_id.read().await.as_ref() {
            return Ok(id.clone());
        }

        let response = self
            .client
            .post(format!("{}/api/v1/collections", self.url))
            .json(&json!({ "name": self.collection, "get_or_create": true }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "get-or-create collection failed");
                RagError::Transport {
                    call: "vector store",
                    message: format!("request failed: {e}"),
                }
            })?;

        let response = Self::check_status("vector store", response).await?;
        let info: CollectionInfo = response.json().await.map_err(|e| {
            RagError::MalformedResponse {
                call: "vector store",
                message: format!("failed to parse collection info: {e}"),
            }
        })?;

        *self.collection_id.write().await = Some(info.id.clone());
        Ok(info.id)
    }

    /// Fail with a [`RagError::Transport`] on a non-2xx response, carrying
    /// the service's error text when present.
    async fn check_status(
        call: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(%status, call, "chroma error");
        Err(RagError::Transport {
            call,
            message: format!("service returned {status}: {body}"),
        })
    }
}

#[async_trait]
impl VectorStore for ChromaVectorStore {
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

        let id = self.collection_id().await?;
        debug!(collection = %self.collection, record_count = ids.len(), "adding records");

        let response = self
            .client
            .post(format!("{}/api/v1/collections/{id}/add", self.url))
            .json(&AddRequest { ids, documents, embeddings })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "add request failed");
                RagError::Transport {
                    call: "vector store add",
                    message: format!("request failed: {e}"),
                }
            })?;

        Self::check_status("vector store add", response).await?;
        Ok(())
    }

    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<Retrieved>> {
        let id = self.collection_id().await?;

        let response = self
            .client
            .post(format!("{}/api/v1/collections/{id}/query", self.url))
            .json(&json!({
                "query_embeddings": [embedding],
                "n_results": n_results,
                "include": ["documents", "distances"],
            }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "query request failed");
                RagError::Transport {
                    call: "vector store query",
                    message: format!("request failed: {e}"),
                }
            })?;

        let response = Self::check_status("vector store query", response).await?;
        let parsed: QueryResponse = response.json().await.map_err(|e| {
            RagError::MalformedResponse {
                call: "vector store query",
                message: format!("failed to parse response: {e}"),
            }
        })?;

        // One query embedding in, one result row out.
        let documents = parsed.documents.into_iter().next().unwrap_or_default();
        let distances = parsed.distances.into_iter().next().unwrap_or_default();
        if documents.len() != distances.len() {
            return Err(RagError::MalformedResponse {
                call: "vector store query",
                message: format!(
                    "{} documents but {} distances",
                    documents.len(),
                    distances.len()
                ),
            });
        }

        Ok(documents
            .into_iter()
            .zip(distances)
            .map(|(text, distance)| Retrieved { text, distance })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        let id = self.collection_id().await?;

        let response = self
            .client
            .get(format!("{}/api/v1/collections/{id}/count", self.url))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "count request failed");
                RagError::Transport {
                    call: "vector store count",
                    message: format!("request failed: {e}"),
                }
            })?;

        let response = Self::check_status("vector store count", response).await?;
        response.json().await.map_err(|e| RagError::MalformedResponse {
            call: "vector store count",
            message: format!("failed to parse count: {e}"),
        })
    }

    async fn reset(&self) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/api/v1/collections/{}", self.url, self.collection))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "delete collection request failed");
                RagError::Transport {
                    call: "vector store reset",
                    message: format!("request failed: {e}"),
                }
            })?;

        // Deleting a collection that does not exist is fine.
        if !response.status().is_success() {
            debug!(status = %response.status(), "delete collection ignored");
        }

        *self.collection_id.write().await = None;
        self.collection_id().await?;
        Ok(())
    }
}
