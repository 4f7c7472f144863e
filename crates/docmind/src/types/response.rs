//! Response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Response from `POST /api/ingest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Always true; failures are reported as errors
    pub success: bool,
    /// Number of chunks embedded and stored
    pub count: usize,
    /// Name of the ingested file
    pub filename: String,
}

impl IngestResponse {
    pub fn new(filename: impl Into<String>, count: usize) -> Self {
        Self {
            success: true,
            count,
            filename: filename.into(),
        }
    }
}

/// Response from `GET /api/seed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    /// Number of records upserted
    pub count: usize,
}
