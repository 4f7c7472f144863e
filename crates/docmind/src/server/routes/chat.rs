//! Chat endpoint: retrieval-grounded, streamed answers

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::TextStream;
use crate::retrieval::{assemble_context, count_qualifying};
use crate::server::state::AppState;
use crate::types::ChatRequest;

/// POST /api/chat - Answer the conversation, streaming plain text.
///
/// When the last message is a user question, the question is embedded and
/// the best matching chunks become the system prompt's context. Otherwise
/// the conversation goes to the model untouched.
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(|e| Error::invalid_request(e.body_text()))?;
    request.validate()?;

    let llm = state.llm_provider();

    let stream = match request.question() {
        None => {
            tracing::info!(
                "Chat bypassing retrieval ({} messages, last is not a user question)",
                request.messages.len()
            );
            llm.stream(None, &request.messages).await?
        }
        Some(question) => {
            let retrieval = &state.config().retrieval;

            let embedding = state.embedding_provider().embed(question).await?;
            let matches = state
                .vector_store_provider()
                .query(&embedding, retrieval.top_k)
                .await?;

            let context = assemble_context(&matches, retrieval.similarity_threshold);
            let (system, strategy) = PromptBuilder::system_prompt(&context, retrieval.fallback);

            tracing::info!(
                "Chat question ({} chars): {} matches, {} above {}, {} prompt",
                question.chars().count(),
                matches.len(),
                count_qualifying(&matches, retrieval.similarity_threshold),
                retrieval.similarity_threshold,
                strategy.as_str()
            );

            llm.stream(Some(system.as_str()), &request.messages).await?
        }
    };

    Ok(text_response(stream))
}

/// Chunked `text/plain` response; a failure mid-stream ends the body early
fn text_response(stream: TextStream) -> Response {
    let body = Body::from_stream(
        stream.inspect_err(|e| tracing::error!("Answer stream failed: {}", e)),
    );

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
