//! Chat completion client for grounded answer synthesis.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::openai::service_error_detail;

/// The default base URL (local LM Studio).
const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "Qwen2.5-7B-Instruct-GGUF";

/// Per-request timeout for chat calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Answers are bounded and deterministic-ish: low temperature, capped length.
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.2;

/// A chat completion backend used to synthesize grounded answers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one system message and one user message, returning the model's
    /// reply text.
    ///
    /// Returns `Ok(None)` when the service responded successfully but the
    /// reply carried no textual content; the caller decides the fallback.
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>>;
}

/// A [`ChatModel`] backed by an OpenAI-compatible `/chat/completions`
/// endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use ragcore::OpenAiChatModel;
///
/// let chat = OpenAiChatModel::new()?.with_model("Qwen2.5-7B-Instruct-GGUF");
/// let reply = chat.complete("You are terse.", "Why is the sky blue?").await?;
/// ```
pub struct OpenAiChatModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiChatModel {
    /// Create a new client with the default base URL and model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Transport`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client =
            reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
                RagError::Transport {
                    call: "chat completion",
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

    /// Set the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a bearer API key. Local servers usually need none.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

// ── API request/response types ─────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>> {
        debug!(model = %self.model, "requesting chat completion");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut request =
            self.client.post(format!("{}/chat/completions", self.base_url)).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "chat completion request failed");
            RagError::Transport {
                call: "chat completion",
                message: format!("request failed: {e}"),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = service_error_detail(body);

            error!(%status, "chat service error");
            return Err(RagError::Transport {
                call: "chat completion",
                message: format!("service returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse chat response");
            RagError::MalformedResponse {
                call: "chat completion",
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}
