//! Provider abstractions for embeddings, chat models and vector storage
//!
//! Each concern sits behind a trait so the hosted backends (HuggingFace,
//! Groq, Gemini, Pinecone) can be swapped for local ones in tests.

pub mod embedding;
pub mod llm;
pub mod vector_store;

pub mod gemini;
pub mod groq;
pub mod huggingface;
pub mod memory;
pub mod pinecone;

pub(crate) mod http;
pub(crate) mod sse;

use std::sync::Arc;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use huggingface::HuggingFaceEmbedder;
pub use llm::{LlmProvider, TextStream};
pub use memory::InMemoryVectorStore;
pub use pinecone::PineconeIndex;
pub use vector_store::VectorStoreProvider;

use crate::config::{EmbeddingConfig, LlmConfig, LlmProviderKind, VectorDbConfig, VectorStoreKind};
use crate::error::Result;

/// Build the configured embedding provider
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(Arc::new(HuggingFaceEmbedder::new(config)?))
}

/// Build the configured chat model provider
pub fn build_llm(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(match config.provider {
        LlmProviderKind::Groq => Arc::new(GroqClient::new(config)?),
        LlmProviderKind::Gemini => Arc::new(GeminiClient::new(config)?),
    })
}

/// Build the configured vector store, resolving the Pinecone host if needed
pub async fn build_vector_store(config: &VectorDbConfig) -> Result<Arc<dyn VectorStoreProvider>> {
    Ok(match config.provider {
        VectorStoreKind::Pinecone => Arc::new(PineconeIndex::connect(config).await?),
        VectorStoreKind::Memory => {
            tracing::warn!("Using in-memory vector store; ingested data is lost on restart");
            Arc::new(InMemoryVectorStore::new())
        }
    })
}
