//! Retrieval: turning vector search matches into prompt context

pub mod assembler;

pub use assembler::{assemble_context, count_qualifying, CONTEXT_SEPARATOR};
