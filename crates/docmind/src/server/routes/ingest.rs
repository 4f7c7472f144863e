//! Document ingestion endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::IngestResponse;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// POST /api/ingest - Upload a PDF, chunk it, embed it and store the vectors
pub async fn ingest_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("upload_{}.pdf", Uuid::new_v4()));

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_request(format!("Failed to read file: {}", e)))?;

        tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

        let count = state.pipeline().ingest(&filename, data.to_vec()).await?;
        return Ok(Json(IngestResponse::new(filename, count)));
    }

    Err(Error::invalid_request("No file uploaded"))
}
