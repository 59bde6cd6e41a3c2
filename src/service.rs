//! Retrieval-answer orchestrator.
//!
//! [`RagService`] is the sole query-time entry point: it embeds the
//! question, retrieves the nearest chunks, scores confidence, and either
//! synthesizes a grounded answer or refuses.

use std::sync::Arc;

use tracing::{debug, info};

use crate::chat::ChatModel;
use crate::config::RagConfig;
use crate::document::{AskResult, Retrieved};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The exact fallback sentence. It doubles as the model's own instructed
/// fallback phrase, and callers may pattern-match on it, so it must never
/// drift.
pub const REFUSAL: &str = "I don't know the answer to your question.";

/// System instruction for grounded answering.
const SYSTEM_PROMPT: &str = "Answer ONLY using the provided context. If the context does not \
                             contain the answer, reply exactly: I don't know the answer to your \
                             question.";

/// Convert an L2 distance to a similarity score in `(0, 1]`.
///
/// Monotonically decreasing in distance: distance 0 maps to 1, and the score
/// approaches 0 as distance grows unbounded.
fn distance_to_score(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// The question-answering orchestrator.
///
/// Per question the flow is embed → retrieve → score → answer-or-refuse.
/// Refusals are ordinary results carrying the computed score; only service
/// failures surface as errors. Construct one via [`RagService::builder()`].
pub struct RagService {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatModel>,
}

impl std::fmt::Debug for RagService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RagService {
    /// Create a new [`RagServiceBuilder`].
    pub fn builder() -> RagServiceBuilder {
        RagServiceBuilder::default()
    }

    /// Return a reference to the service configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer a question from the ingested corpus, or refuse.
    ///
    /// Retrieves the `top_k` nearest chunks and scores confidence from the
    /// *nearest* one: `score = 1 / (1 + best_distance)`. A score below the
    /// configured threshold refuses with the true score attached (the caller
    /// can observe how close it came); a score exactly at the threshold
    /// answers. An empty store refuses with score 0. Scoring on the single
    /// nearest chunk keeps one strong match among weak ones answerable.
    ///
    /// # Errors
    ///
    /// Propagates embedding, store, and chat service failures. Refusals and
    /// missing chat content are never errors.
    pub async fn ask(&self, question: &str) -> Result<AskResult> {
        let question = question.trim();

        let query_embedding = self.embedder.embed(question).await?;
        let retrieved = self.store.query(&query_embedding, self.config.top_k).await?;

        if retrieved.is_empty() {
            info!("no documents retrieved, refusing");
            return Ok(AskResult { answer: REFUSAL.to_string(), context_used: None, score: 0.0 });
        }

        let best_distance =
            retrieved.iter().map(|r| r.distance).fold(f32::INFINITY, f32::min);
        let score = distance_to_score(best_distance);
        debug!(best_distance, score, retrieved = retrieved.len(), "scored retrieval");

        if score < self.config.similarity_threshold {
            info!(score, threshold = self.config.similarity_threshold, "below threshold, refusing");
            return Ok(AskResult { answer: REFUSAL.to_string(), context_used: None, score });
        }

        let context = build_context(&retrieved);
        let answer = self.chat_with_context(question, &context).await?;

        info!(score, context_len = context.len(), "answered from context");
        Ok(AskResult { answer, context_used: Some(context), score })
    }

    /// Ask the chat model to answer from the context, falling back to the
    /// refusal sentence when the reply carries no usable text.
    async fn chat_with_context(&self, question: &str, context: &str) -> Result<String> {
        let system = format!("{SYSTEM_PROMPT}\n\nContext:\n{context}");
        let content = self.chat.complete(&system, question).await?;

        Ok(content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| REFUSAL.to_string()))
    }
}

/// Join retrieved texts in ranked order, separated by a blank line.
fn build_context(retrieved: &[Retrieved]) -> String {
    retrieved.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join("\n\n").trim().to_string()
}

/// Builder for constructing a [`RagService`].
///
/// The three collaborators are required; `config` defaults to
/// [`RagConfig::default()`].
///
/// # Example
///
/// ```rust,ignore
/// let service = RagService::builder()
///     .config(RagConfig::default())
///     .embedder(Arc::new(embedder))
///     .store(Arc::new(store))
///     .chat(Arc::new(chat))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagServiceBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    chat: Option<Arc<dyn ChatModel>>,
}

impl RagServiceBuilder {
    /// Set the service configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the chat completion backend.
    pub fn chat(mut self, chat: Arc<dyn ChatModel>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Build the [`RagService`], validating that all collaborators are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] if a required collaborator is
    /// missing.
    pub fn build(self) -> Result<RagService> {
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Validation("embedder is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RagError::Validation("store is required".to_string()))?;
        let chat =
            self.chat.ok_or_else(|| RagError::Validation("chat is required".to_string()))?;

        Ok(RagService { config: self.config.unwrap_or_default(), embedder, store, chat })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_scores_one() {
        assert_eq!(distance_to_score(0.0), 1.0);
    }

    #[test]
    fn score_decreases_monotonically_with_distance() {
        let distances = [0.0, 0.1, 0.5, 1.0, 3.0, 10.0, 1e6];
        for pair in distances.windows(2) {
            assert!(distance_to_score(pair[0]) > distance_to_score(pair[1]));
        }
    }

    #[test]
    fn context_joins_texts_with_blank_lines() {
        let retrieved = vec![
            Retrieved { text: "first".into(), distance: 0.1 },
            Retrieved { text: "second".into(), distance: 0.2 },
        ];
        assert_eq!(build_context(&retrieved), "first\n\nsecond");
    }
}
