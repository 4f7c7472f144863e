//! Document, chunk and vector record types

use serde::{Deserialize, Serialize};

/// A document being ingested. Lives only for the duration of one upload.
#[derive(Debug, Clone)]
pub struct Document {
    /// Filename as uploaded, used as the chunk source
    pub filename: String,
    /// Extracted text
    pub text: String,
    /// Page count when the parser could determine it
    pub total_pages: Option<u32>,
}

impl Document {
    /// Create a new document
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            total_pages: None,
        }
    }
}

/// A chunk of a document's cleaned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub text: String,
    /// Source filename
    pub source: String,
    /// Position of the chunk within its document
    pub index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: String, source: String, index: u32) -> Self {
        Self { text, source, index }
    }

    /// Vector record id: `{source}-{timestamp_ms}-{index}`
    pub fn record_id(&self, timestamp_ms: i64) -> String {
        format!("{}-{}-{}", self.source, timestamp_ms, self.index)
    }

    /// Build the record stored in the vector database
    pub fn into_record(self, values: Vec<f32>, timestamp_ms: i64) -> VectorRecord {
        VectorRecord {
            id: self.record_id(timestamp_ms),
            values,
            metadata: ChunkMetadata {
                text: Some(self.text),
                source: Some(self.source),
            },
        }
    }
}

/// Metadata stored alongside each vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Chunk text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Source filename (absent for seeded records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ChunkMetadata {
    /// Metadata holding only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            source: None,
        }
    }
}

/// A vector plus metadata, as upserted into the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Record id
    pub id: String,
    /// Embedding
    pub values: Vec<f32>,
    /// Stored metadata
    pub metadata: ChunkMetadata,
}

/// A similarity search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Record id
    #[serde(default)]
    pub id: String,
    /// Similarity score, provider-defined range
    #[serde(default)]
    pub score: Option<f32>,
    /// Stored metadata, when requested and present
    #[serde(default)]
    pub metadata: Option<ChunkMetadata>,
}

impl Match {
    /// Create a match with text metadata
    pub fn new(id: impl Into<String>, score: f32, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score: Some(score),
            metadata: Some(ChunkMetadata::text(text)),
        }
    }

    /// The stored chunk text, if any
    pub fn text(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.text.as_deref())
    }
}
