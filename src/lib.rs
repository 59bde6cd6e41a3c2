//! # ragcore
//!
//! Retrieval-augmented question answering: chunk a text corpus, embed the
//! chunks, store them in a vector database, and at query time ground a
//! language-model answer in the most similar chunks — refusing to answer
//! when retrieval confidence is low.
//!
//! ## Overview
//!
//! - [`SentenceChunker`] — bounded-size, sentence-aware corpus splitting
//! - [`EmbeddingProvider`] / [`OpenAiEmbeddingProvider`] — text → vectors via
//!   an OpenAI-compatible embeddings endpoint (e.g. LM Studio)
//! - [`VectorStore`] / [`ChromaVectorStore`] / [`InMemoryVectorStore`] —
//!   (id, text, embedding) storage with L2 nearest-neighbor search
//! - [`IngestPipeline`] — chunk → embed → repopulate the store wholesale
//! - [`RagService`] — embed the question, retrieve, score, then answer via a
//!   [`ChatModel`] or return the fixed refusal sentence
//!
//! The HTTP boundary (routing, input validation, env loading) lives outside
//! this crate; it wires concrete clients into the service once per process.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragcore::{
//!     ChromaVectorStore, IngestPipeline, OpenAiChatModel, OpenAiEmbeddingProvider,
//!     RagConfig, RagService, SentenceChunker,
//! };
//!
//! let config = RagConfig::default();
//! let embedder = Arc::new(OpenAiEmbeddingProvider::new()?);
//! let store = Arc::new(ChromaVectorStore::new()?);
//!
//! let pipeline = IngestPipeline::new(
//!     Arc::new(SentenceChunker::from_config(&config)),
//!     embedder.clone(),
//!     store.clone(),
//! );
//! pipeline.ingest(&corpus_text).await?;
//!
//! let service = RagService::builder()
//!     .config(config)
//!     .embedder(embedder)
//!     .store(store)
//!     .chat(Arc::new(OpenAiChatModel::new()?))
//!     .build()?;
//! let result = service.ask("What color is the sky?").await?;
//! ```

pub mod chat;
pub mod chroma;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod openai;
pub mod pipeline;
pub mod service;
pub mod vectorstore;

pub use chat::{ChatModel, OpenAiChatModel};
pub use chroma::ChromaVectorStore;
pub use chunking::{Chunker, SentenceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{AskResult, Chunk, Retrieved};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use openai::OpenAiEmbeddingProvider;
pub use pipeline::IngestPipeline;
pub use service::{RagService, RagServiceBuilder, REFUSAL};
pub use vectorstore::VectorStore;
