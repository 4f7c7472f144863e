//! LLM provider trait for chat completion

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::types::ChatMessage;

/// Incremental answer text, in arrival order
pub type TextStream = BoxStream<'static, Result<String>>;

/// Trait for chat-style answer generation
///
/// Implementations:
/// - `GroqClient`: Groq chat completions (llama-3.3-70b-versatile)
/// - `GeminiClient`: Google Gemini
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a complete answer
    async fn complete(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<String>;

    /// Generate an answer as a stream of text deltas.
    ///
    /// Errors before the first byte (auth, rate limits) are returned directly;
    /// later failures surface as stream items.
    async fn stream(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<TextStream>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
