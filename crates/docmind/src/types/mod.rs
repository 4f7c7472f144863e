//! Core types for DocMind

pub mod chat;
pub mod document;
pub mod response;

pub use chat::{ChatMessage, ChatRequest, Role};
pub use document::{Chunk, ChunkMetadata, Document, Match, VectorRecord};
pub use response::{IngestResponse, SeedResponse};
