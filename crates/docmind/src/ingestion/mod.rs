//! Document ingestion: PDF parsing, chunking and batched indexing

mod chunker;
mod parser;
mod pipeline;

pub use chunker::{normalize_whitespace, TextChunker};
pub use parser::PdfParser;
pub use pipeline::IngestPipeline;

#[cfg(test)]
pub(crate) use parser::tests::sample_pdf;
#[cfg(test)]
pub(crate) use pipeline::tests::FakeEmbedder;
