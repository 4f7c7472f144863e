//! API routes for the DocMind server

pub mod chat;
pub mod ingest;
pub mod seed;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Ingestion - with larger body limit for file uploads
        .route(
            "/ingest",
            post(ingest::ingest_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/chat", post(chat::chat))
        .route("/seed", get(seed::seed))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();

    Json(serde_json::json!({
        "name": "docmind",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Chat with your PDFs: retrieval-grounded answers over an embedded document index",
        "endpoints": {
            "POST /api/ingest": "Upload a PDF (multipart field `file`) and index its chunks",
            "POST /api/chat": "Stream an answer to a conversation ({messages: [...]})",
            "GET /api/seed": "Index a few sample sentences",
            "GET /api/info": "This document"
        },
        "providers": {
            "embeddings": state.embedding_provider().name(),
            "llm": state.llm_provider().name(),
            "model": state.llm_provider().model(),
            "vector_store": state.vector_store_provider().name()
        },
        "retrieval": {
            "top_k": config.retrieval.top_k,
            "similarity_threshold": config.retrieval.similarity_threshold,
            "fallback": config.retrieval.fallback
        },
        "chunking": {
            "chunk_size": config.chunking.chunk_size,
            "chunk_overlap": config.chunking.chunk_overlap
        }
    }))
}
