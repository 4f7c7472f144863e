//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `HuggingFaceEmbedder`: HuggingFace inference (all-mpnet-base-v2)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving order.
    ///
    /// Default implementation issues one concurrent `embed` call per text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        try_join_all(texts.iter().map(|text| self.embed(text))).await
    }

    /// Embedding dimensions (768 for all-mpnet-base-v2)
    fn dimensions(&self) -> usize;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
