//! Fixed-size text chunking with overlap and word-boundary backtracking
//!
//! Lengths and offsets are counted in chars, so a window never splits a
//! multi-byte character.

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks in characters
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl TextChunker {
    /// Create a new chunker. `overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Create from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into overlapping windows.
    ///
    /// Whitespace runs are collapsed to single spaces first. Every window but
    /// the last is cut back to its last space, and the next window starts
    /// `overlap` chars before that cut. A window with no usable space is
    /// emitted whole.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let clean = normalize_whitespace(text);
        let chars: Vec<char> = clean.chars().collect();
        let len = chars.len();

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < len {
            let end = start + self.chunk_size;
            let window = &chars[start..end.min(len)];

            if end >= len {
                chunks.push(window.iter().collect());
                break;
            }

            // A cut at or before `overlap` would not move the cursor forward
            match window.iter().rposition(|c| *c == ' ') {
                Some(cut) if cut > self.overlap => {
                    chunks.push(window[..cut].iter().collect());
                    start += cut - self.overlap;
                }
                _ => {
                    chunks.push(window.iter().collect());
                    start += self.chunk_size - self.overlap;
                }
            }
        }

        chunks
    }

    /// Chunk a document, tagging each chunk with its source and position
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        self.chunk(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(text, doc.filename.clone(), index as u32))
            .collect()
    }
}

/// Collapse every whitespace run to one space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
