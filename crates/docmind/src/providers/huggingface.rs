//! HuggingFace inference embeddings (feature extraction pipeline)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::embedding::EmbeddingProvider;
use super::http::{build_client, check_status, retry_request};
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

/// Embedder backed by the HuggingFace feature-extraction pipeline
pub struct HuggingFaceEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
    max_retries: u32,
}

#[derive(Serialize)]
struct FeatureRequest<'a> {
    inputs: &'a str,
}

/// Sentence models return one vector; token models return one vector per token
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureResponse {
    Pooled(Vec<f32>),
    Tokens(Vec<Vec<f32>>),
}

impl FeatureResponse {
    fn into_embedding(self) -> Result<Vec<f32>> {
        match self {
            FeatureResponse::Pooled(vector) => Ok(vector),
            FeatureResponse::Tokens(tokens) => mean_pool(&tokens),
        }
    }
}

/// Average token vectors into one sentence vector
fn mean_pool(tokens: &[Vec<f32>]) -> Result<Vec<f32>> {
    let dims = tokens
        .first()
        .map(Vec::len)
        .ok_or_else(|| Error::embedding("Empty token embeddings"))?;

    let mut pooled = vec![0.0f32; dims];
    for token in tokens {
        if token.len() != dims {
            return Err(Error::embedding("Ragged token embeddings"));
        }
        for (acc, value) in pooled.iter_mut().zip(token) {
            *acc += value;
        }
    }

    let count = tokens.len() as f32;
    pooled.iter_mut().for_each(|v| *v /= count);
    Ok(pooled)
}

impl HuggingFaceEmbedder {
    /// Create a new embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let endpoint = format!(
            "{}/{}/pipeline/feature-extraction",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post(&self, inputs: &str) -> Result<reqwest::Response> {
        let mut request = self.client.post(&self.endpoint).json(&FeatureRequest { inputs });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        check_status(response, "huggingface", Error::Embedding).await
    }

    fn check_dimensions(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Model {} returned {} dimensions, expected {}",
                self.model,
                embedding.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = retry_request(self.max_retries, "HuggingFace embedding", || async {
            let response = self.post(text).await?;
            let parsed: FeatureResponse = response
                .json()
                .await
                .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;
            parsed.into_embedding()
        })
        .await?;

        self.check_dimensions(&embedding)?;
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        match self.embed("health check").await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("HuggingFace health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
