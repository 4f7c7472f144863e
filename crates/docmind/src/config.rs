//! Configuration for the DocMind service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DOCMIND_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval and context assembly configuration
    pub retrieval: RetrievalConfig,
    /// Ingestion batching
    pub ingestion: IngestionConfig,
    /// Embedding provider (HuggingFace)
    pub embeddings: EmbeddingConfig,
    /// Chat model provider (Groq or Gemini)
    pub llm: LlmConfig,
    /// Vector database (Pinecone or in-memory)
    pub vector_db: VectorDbConfig,
    /// Sample data for the seed endpoint
    pub seed: SeedConfig,
}

impl RagConfig {
    /// Load configuration.
    ///
    /// Resolution order: explicit `path`, then `DOCMIND_CONFIG`, then
    /// `<config dir>/docmind/config.toml` if it exists, else defaults.
    /// API keys from the environment override whatever the file holds.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    tracing::info!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text; missing sections use defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docmind").join("config.toml"))
    }

    /// Fill API keys from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("PINECONE_API_KEY") {
            self.vector_db.api_key = Some(key);
        }
        if let Some(key) = non_empty("HUGGINGFACE_API_KEY") {
            self.embeddings.api_key = Some(key);
        }
        let llm_env = match self.llm.provider {
            LlmProviderKind::Groq => "GROQ_API_KEY",
            LlmProviderKind::Gemini => "GEMINI_API_KEY",
        };
        if let Some(key) = non_empty(llm_env) {
            self.llm.api_key = Some(key);
        }
    }

    /// Reject settings that would break chunking or retrieval
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.ingestion.batch_size == 0 {
            return Err(Error::Config("ingestion.batch_size must be positive".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be positive".to_string()));
        }
        if !self.retrieval.similarity_threshold.is_finite() {
            return Err(Error::Config(
                "retrieval.similarity_threshold must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 20MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_size: 20 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// What the chat prompt does when no match clears the threshold
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContextFallback {
    /// Answer from general knowledge
    #[default]
    General,
    /// Tell the user the documents do not contain the answer
    Strict,
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Matches requested from the vector store
    pub top_k: usize,
    /// Matches must score strictly above this to enter the context
    pub similarity_threshold: f32,
    /// Prompting strategy for an empty context
    pub fallback: ContextFallback,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.6,
            fallback: ContextFallback::General,
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Chunks embedded concurrently and upserted together
    pub batch_size: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self { batch_size: 50 }
    }
}

/// Embedding configuration (HuggingFace feature extraction)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Inference API base URL; the model id is appended
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Embedding dimensions (768 for all-mpnet-base-v2)
    pub dimensions: usize,
    /// API token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            model: "sentence-transformers/all-mpnet-base-v2".to_string(),
            dimensions: 768,
            api_key: None,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Chat model backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    /// Groq (OpenAI-compatible chat completions)
    #[default]
    Groq,
    /// Google Gemini
    Gemini,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: LlmProviderKind,
    /// API base URL (provider default when unset)
    pub base_url: Option<String>,
    /// Model name (provider default when unset)
    pub model: Option<String>,
    /// API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for failed requests; rate limits are never retried
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Groq,
            base_url: None,
            model: None,
            api_key: None,
            temperature: 0.3,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Model name after applying the provider default
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, LlmProviderKind::Groq) => "llama-3.3-70b-versatile",
            (None, LlmProviderKind::Gemini) => "gemini-2.0-flash",
        }
    }

    /// Base URL after applying the provider default
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url,
            (None, LlmProviderKind::Groq) => "https://api.groq.com/openai/v1",
            (None, LlmProviderKind::Gemini) => "https://generativelanguage.googleapis.com/v1beta",
        }
    }
}

/// Vector database backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreKind {
    /// Hosted Pinecone index
    #[default]
    Pinecone,
    /// Process-local store, lost on restart
    Memory,
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Backend
    pub provider: VectorStoreKind,
    /// Pinecone API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Index name
    pub index_name: String,
    /// Index data-plane host; resolved through the control plane when unset
    pub index_host: Option<String>,
    /// Control-plane URL used to resolve the index host
    pub control_plane_url: String,
    /// Namespace within the index
    pub namespace: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            provider: VectorStoreKind::Pinecone,
            api_key: None,
            index_name: "docmind".to_string(),
            index_host: None,
            control_plane_url: "https://api.pinecone.io".to_string(),
            namespace: None,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Seed endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Sentences embedded and upserted by `GET /api/seed`
    pub texts: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            texts: vec![
                "TypeScript is a superset of JavaScript.".to_string(),
                "Next.js is a React framework.".to_string(),
                "Google Gemini is a multimodal AI.".to_string(),
                "RAG stands for Retrieval-Augmented Generation.".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.ingestion.batch_size, 50);
        assert_eq!(config.vector_db.index_name, "docmind");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [retrieval]
            similarity_threshold = 0.35
            fallback = "strict"

            [llm]
            provider = "gemini"
            "#,
        )
        .unwrap();

        assert_eq!(config.retrieval.similarity_threshold, 0.35);
        assert_eq!(config.retrieval.fallback, ContextFallback::Strict);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.llm.provider, LlmProviderKind::Gemini);
        assert_eq!(config.llm.model_name(), "gemini-2.0-flash");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = RagConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides_keys() {
        let env: HashMap<&str, &str> = [
            ("PINECONE_API_KEY", "pc-key"),
            ("GROQ_API_KEY", "groq-key"),
            ("GEMINI_API_KEY", "gemini-key"),
            ("HUGGINGFACE_API_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config.embeddings.api_key = Some("from-file".to_string());
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.vector_db.api_key.as_deref(), Some("pc-key"));
        assert_eq!(config.llm.api_key.as_deref(), Some("groq-key"));
        // blank values do not clobber the file
        assert_eq!(config.embeddings.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_keys_are_not_serialized() {
        let mut config = RagConfig::default();
        config.vector_db.api_key = Some("secret".to_string());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
