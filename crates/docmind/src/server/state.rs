//! Application state for the DocMind server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{IngestPipeline, TextChunker};
use crate::providers::{self, EmbeddingProvider, LlmProvider, VectorStoreProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider (HuggingFace)
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider (Groq or Gemini)
    llm_provider: Arc<dyn LlmProvider>,
    /// Vector store (Pinecone or in-memory)
    vector_store_provider: Arc<dyn VectorStoreProvider>,
    /// Parse, chunk, embed and upsert uploads
    pipeline: IngestPipeline,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state from already constructed providers
    pub fn new(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
        vector_store_provider: Arc<dyn VectorStoreProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let chunker = TextChunker::from_config(&config.chunking)?;
        let pipeline = IngestPipeline::new(
            chunker,
            config.ingestion.batch_size,
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store_provider),
        );

        tracing::info!(
            "State ready (embeddings: {}, llm: {}/{}, vector store: {})",
            embedding_provider.name(),
            llm_provider.name(),
            llm_provider.model(),
            vector_store_provider.name()
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider,
                llm_provider,
                vector_store_provider,
                pipeline,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Build the hosted providers named in the configuration
    pub async fn from_config(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing DocMind application state...");

        let embedder = providers::build_embedder(&config.embeddings)?;
        let llm = providers::build_llm(&config.llm)?;
        let store = providers::build_vector_store(&config.vector_db).await?;

        Self::new(config, embedder, llm, store)
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    pub fn vector_store_provider(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.inner.vector_store_provider
    }

    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
