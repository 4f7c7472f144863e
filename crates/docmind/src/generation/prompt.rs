//! System prompts for chat answers

use crate::config::ContextFallback;

/// Which system prompt a chat turn used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStrategy {
    /// Answer from the retrieved context
    Grounded,
    /// No context; answer from general knowledge
    General,
    /// No context; say the documents do not cover it
    Strict,
}

impl PromptStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStrategy::Grounded => "grounded",
            PromptStrategy::General => "general",
            PromptStrategy::Strict => "strict",
        }
    }
}

/// Builds the system prompt for a chat turn
pub struct PromptBuilder;

impl PromptBuilder {
    /// Pick the prompt strategy for an assembled context
    pub fn strategy(context: &str, fallback: ContextFallback) -> PromptStrategy {
        if !context.is_empty() {
            return PromptStrategy::Grounded;
        }
        match fallback {
            ContextFallback::General => PromptStrategy::General,
            ContextFallback::Strict => PromptStrategy::Strict,
        }
    }

    /// Build the system prompt, returning it with the strategy used
    pub fn system_prompt(context: &str, fallback: ContextFallback) -> (String, PromptStrategy) {
        let strategy = Self::strategy(context, fallback);
        let prompt = match strategy {
            PromptStrategy::Grounded => Self::grounded(context),
            PromptStrategy::General => Self::general(),
            PromptStrategy::Strict => Self::strict(),
        };
        (prompt, strategy)
    }

    fn grounded(context: &str) -> String {
        format!(
            r#"You are DocMind, an AI assistant specialised in answering questions about the user's documents.
Be concise, precise and direct.

Answer the user's question using the context below.
If the answer is not in the context, you may use your general knowledge.

CONTEXT:
"""
{context}
""""#,
            context = context
        )
    }

    fn general() -> String {
        "You are DocMind, an AI assistant. \
         Answer questions concisely, precisely and helpfully. \
         Be friendly and get straight to the point."
            .to_string()
    }

    fn strict() -> String {
        "You are DocMind, an AI assistant that answers only from the user's documents. \
         No relevant passages were found for this question. \
         Tell the user that the information is not available in the provided documents, \
         and do not answer from general knowledge."
            .to_string()
    }
}
