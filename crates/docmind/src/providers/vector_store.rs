//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Match, VectorRecord};

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `PineconeIndex`: hosted Pinecone index
/// - `InMemoryVectorStore`: process-local cosine search
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert or overwrite records by id
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Nearest neighbours of `vector`, best first, with metadata
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
