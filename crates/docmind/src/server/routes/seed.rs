//! Sample data endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChunkMetadata, SeedResponse, VectorRecord};

/// GET /api/seed - Embed the configured sample sentences and upsert them
/// with ids `id-0`, `id-1`, ... Re-seeding overwrites the same records.
pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    let texts = &state.config().seed.texts;

    let embeddings = state.embedding_provider().embed_batch(texts).await?;
    if embeddings.len() != texts.len() {
        return Err(Error::embedding(format!(
            "Expected {} embeddings, got {}",
            texts.len(),
            embeddings.len()
        )));
    }

    let records: Vec<VectorRecord> = texts
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (text, values))| VectorRecord {
            id: format!("id-{}", i),
            values,
            metadata: ChunkMetadata::text(text.as_str()),
        })
        .collect();

    state.vector_store_provider().upsert(&records).await?;
    tracing::info!("Seeded {} sample records", records.len());

    Ok(Json(SeedResponse {
        message: "Seed completed successfully".to_string(),
        count: records.len(),
    }))
}
