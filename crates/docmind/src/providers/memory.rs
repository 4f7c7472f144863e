//! Process-local vector store with brute-force cosine search
//!
//! Useful for development and tests; contents are lost on restart.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::vector_store::VectorStoreProvider;
use crate::error::{Error, Result};
use crate::types::{Match, VectorRecord};

/// In-memory vector store keyed by record id
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut store = self.records.write();
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>> {
        let store = self.records.read();

        if let Some(record) = store.values().find(|r| r.values.len() != vector.len()) {
            return Err(Error::vector_db(format!(
                "Query has {} dimensions but record '{}' has {}",
                vector.len(),
                record.id,
                record.values.len()
            )));
        }

        let mut scored: Vec<Match> = store
            .values()
            .map(|record| Match {
                id: record.id.clone(),
                score: Some(cosine_similarity(&record.values, vector)),
                metadata: Some(record.metadata.clone()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn record(id: &str, values: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: ChunkMetadata::text(id),
        }
    }

    #[tokio::test]
    async fn test_query_orders_by_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                record("east", vec![1.0, 0.0]),
                record("north", vec![0.0, 1.0]),
                record("northeast", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.1], 2).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["east", "northeast"]);
        assert_eq!(matches[0].text(), Some("east"));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_id() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[record("id-0", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(&[record("id-0", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(store.len(), 1);
        let matches = store.query(&[0.0, 1.0], 1).await.unwrap();
        assert!((matches[0].score.unwrap() - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[record("a", vec![1.0, 0.0, 0.0])]).await.unwrap();
        assert!(store.query(&[1.0, 0.0], 1).await.is_err());
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
