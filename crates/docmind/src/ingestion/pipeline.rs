//! Ingestion pipeline orchestration: parse, chunk, embed, upsert

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Chunk, Document, VectorRecord};

use super::chunker::TextChunker;
use super::parser::PdfParser;

/// Main ingestion pipeline
pub struct IngestPipeline {
    chunker: TextChunker,
    batch_size: usize,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        chunker: TextChunker,
        batch_size: usize,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self {
            chunker,
            batch_size: batch_size.max(1),
            embedder,
            store,
        }
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Extract text from an uploaded PDF off the async runtime
    pub async fn parse(&self, filename: &str, data: Vec<u8>) -> Result<Document> {
        let name = filename.to_string();
        tokio::task::spawn_blocking(move || PdfParser::parse(&name, &data))
            .await
            .map_err(|e| Error::internal(format!("PDF parsing task failed: {}", e)))?
    }

    /// Full ingestion of one uploaded file. Returns the number of chunks stored.
    pub async fn ingest(&self, filename: &str, data: Vec<u8>) -> Result<usize> {
        let start = Instant::now();
        let doc = self.parse(filename, data).await?;

        let chunks = self.chunker.chunk_document(&doc);
        tracing::info!(
            "Extracted text from {} ({} chars, {} pages). Embedding {} chunks",
            doc.filename,
            doc.text.len(),
            doc.total_pages.map_or_else(|| "?".to_string(), |p| p.to_string()),
            chunks.len()
        );

        let count = self.store_chunks(chunks).await?;
        tracing::info!(
            "Ingested {} ({} chunks) in {:.1}s",
            doc.filename,
            count,
            start.elapsed().as_secs_f64()
        );
        Ok(count)
    }

    /// Embed and upsert chunks in sequential batches.
    ///
    /// Embeddings within a batch are requested concurrently; each batch is
    /// upserted once all of its embeddings are in. The first failure aborts
    /// the remaining batches; earlier batches stay stored.
    pub async fn store_chunks(&self, chunks: Vec<Chunk>) -> Result<usize> {
        let total = chunks.len();
        let batches = total.div_ceil(self.batch_size);
        let mut remaining = chunks.into_iter();

        for batch_number in 1..=batches {
            let batch: Vec<Chunk> = remaining.by_ref().take(self.batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();

            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let timestamp = chrono::Utc::now().timestamp_millis();
            let records: Vec<VectorRecord> = batch
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, values)| chunk.into_record(values, timestamp))
                .collect();

            self.store.upsert(&records).await?;
            tracing::info!(
                "Batch {}/{} saved to {} ({} vectors)",
                batch_number,
                batches,
                self.store.name(),
                records.len()
            );
        }

        Ok(total)
    }
}
