//! Pinecone vector index client (REST data plane)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::http::{build_client, check_status, retry_request};
use super::vector_store::VectorStoreProvider;
use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::types::{Match, VectorRecord};

const API_VERSION: &str = "2025-01";

/// Client for one Pinecone index
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
    max_retries: u32,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

fn with_scheme(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

impl PineconeIndex {
    /// Connect to the configured index.
    ///
    /// Uses `index_host` when set, otherwise asks the control plane for the
    /// index's data-plane host.
    pub async fn connect(config: &VectorDbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("PINECONE_API_KEY is not set".to_string()))?;
        let client = build_client(config.timeout_secs)?;

        let host = match &config.index_host {
            Some(host) => with_scheme(host),
            None => {
                let host = Self::describe_host(&client, config, &api_key).await?;
                tracing::info!("Resolved Pinecone index '{}' to {}", config.index_name, host);
                host
            }
        };

        Ok(Self {
            client,
            host,
            api_key,
            namespace: config.namespace.clone(),
            max_retries: config.max_retries,
        })
    }

    async fn describe_host(client: &Client, config: &VectorDbConfig, api_key: &str) -> Result<String> {
        let url = format!(
            "{}/indexes/{}",
            config.control_plane_url.trim_end_matches('/'),
            config.index_name
        );

        let response = client
            .get(&url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Failed to describe index: {}", e)))?;
        let response = check_status(response, "pinecone", Error::VectorDb).await?;

        let description: IndexDescription = response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("Failed to parse index description: {}", e)))?;

        Ok(with_scheme(&description.host))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.host, path))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }
}

#[async_trait]
impl VectorStoreProvider for PineconeIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let body = UpsertRequest {
            vectors: records,
            namespace: self.namespace.as_deref(),
        };

        let upserted = retry_request(self.max_retries, "Pinecone upsert", || async {
            let response = self
                .post("/vectors/upsert")
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::vector_db(format!("Upsert request failed: {}", e)))?;
            let response = check_status(response, "pinecone", Error::VectorDb).await?;
            let parsed: UpsertResponse = response
                .json()
                .await
                .map_err(|e| Error::vector_db(format!("Failed to parse upsert response: {}", e)))?;
            Ok(parsed.upserted_count)
        })
        .await?;

        tracing::debug!("Pinecone upserted {} of {} vectors", upserted, records.len());
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        retry_request(self.max_retries, "Pinecone query", || async {
            let response = self
                .post("/query")
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::vector_db(format!("Query request failed: {}", e)))?;
            let response = check_status(response, "pinecone", Error::VectorDb).await?;
            let parsed: QueryResponse = response
                .json()
                .await
                .map_err(|e| Error::vector_db(format!("Failed to parse query response: {}", e)))?;
            Ok(parsed.matches)
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let result = self
            .post("/describe_index_stats")
            .json(&serde_json::json!({}))
            .send()
            .await;

        match result {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("Pinecone health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
