//! Embedding provider for OpenAI-compatible `/embeddings` endpoints.
//!
//! Works against any server speaking the OpenAI embeddings surface; the
//! default base URL targets a local LM Studio instance.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default base URL (local LM Studio).
const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

/// The default embedding model.
const DEFAULT_MODEL: &str = "nomic-ai/nomic-embed-text-v1.5";

/// Per-request timeout for embedding calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings API.
///
/// Inputs are normalized before sending: embedded newlines collapse to
/// spaces and surrounding whitespace is trimmed. Batch requests are atomic —
/// a response whose vector count disagrees with the input count is rejected
/// as malformed rather than returned partially.
///
/// # Example
///
/// ```rust,ignore
/// use ragcore::OpenAiEmbeddingProvider;
///
/// let provider = OpenAiEmbeddingProvider::new()?
///     .with_base_url("http://localhost:1234/v1")
///     .with_model("nomic-ai/nomic-embed-text-v1.5");
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiEmbeddingProvider {
    /// Create a new provider with the default base URL and model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Transport`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client =
            reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
                RagError::Transport {
                    call: "embeddings",
                    message: format!("failed to build HTTP client: {e}"),
                }
            })?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
        })
    }

    /// Set the base URL of the OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a bearer API key. Local servers usually need none.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Collapse embedded newlines to spaces and trim.
    fn normalize(text: &str) -> String {
        text.replace('\n', " ").trim().to_string()
    }
}

// ── API request/response types ─────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: serde_json::Value,
}

/// Pull the service's own error message out of a non-2xx body, falling back
/// to the raw body text.
pub(crate) fn service_error_detail(body: String) -> String {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => match parsed.error {
            serde_json::Value::String(s) => s,
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        },
        Err(_) => body,
    }
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::MalformedResponse {
            call: "embeddings",
            message: "service returned no embedding".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");

        let input: Vec<String> = texts.iter().map(|t| Self::normalize(t)).collect();
        let request_body = EmbeddingRequest { model: &self.model, input };

        let mut request =
            self.client.post(format!("{}/embeddings", self.base_url)).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "embeddings request failed");
            RagError::Transport { call: "embeddings", message: format!("request failed: {e}") }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = service_error_detail(body);

            error!(%status, "embeddings service error");
            return Err(RagError::Transport {
                call: "embeddings",
                message: format!("service returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse embeddings response");
            RagError::MalformedResponse {
                call: "embeddings",
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embedding_response.data.len() != texts.len() {
            return Err(RagError::MalformedResponse {
                call: "embeddings",
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    embedding_response.data.len()
                ),
            });
        }

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }
}
