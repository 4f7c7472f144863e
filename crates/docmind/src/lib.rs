//! docmind: chat with your PDFs
//!
//! Uploaded PDFs are split into overlapping chunks, embedded with a hosted
//! sentence-embedding model and stored in a vector index. Chat questions are
//! embedded the same way; the closest chunks above a similarity threshold
//! become the context of a streamed LLM answer.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use ingestion::TextChunker;
pub use retrieval::assemble_context;
pub use types::{ChatMessage, ChatRequest, Chunk, Document, Match};
