//! Configuration for the retrieval core.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters shared by ingestion and question answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Minimum chunk size in characters (soft bound: the final chunk of a
    /// document may be shorter).
    pub min_chunk: usize,
    /// Maximum chunk size in characters (hard bound).
    pub max_chunk: usize,
    /// Number of nearest chunks retrieved per question.
    pub top_k: usize,
    /// Minimum similarity score in `[0, 1]` required to answer instead of
    /// refuse. A best score exactly equal to the threshold still answers.
    pub similarity_threshold: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { min_chunk: 300, max_chunk: 500, top_k: 5, similarity_threshold: 0.3 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the minimum chunk size in characters.
    pub fn min_chunk(mut self, size: usize) -> Self {
        self.config.min_chunk = size;
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn max_chunk(mut self, size: usize) -> Self {
        self.config.max_chunk = size;
        self
    }

    /// Set the number of nearest chunks retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity score required to answer.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] if:
    /// - `min_chunk >= max_chunk`
    /// - `top_k == 0`
    /// - `similarity_threshold` is outside `[0, 1]`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.min_chunk >= self.config.max_chunk {
            return Err(RagError::Validation(format!(
                "min_chunk ({}) must be less than max_chunk ({})",
                self.config.min_chunk, self.config.max_chunk
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Validation("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.config.similarity_threshold) {
            return Err(RagError::Validation(format!(
                "similarity_threshold ({}) must be within [0, 1]",
                self.config.similarity_threshold
            )));
        }
        Ok(self.config)
    }
}
