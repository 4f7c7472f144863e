//! Answer generation: system prompt selection

pub mod prompt;

pub use prompt::{PromptBuilder, PromptStrategy};
