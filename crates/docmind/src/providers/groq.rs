//! Groq chat completions client (OpenAI-compatible API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{build_client, build_streaming_client, check_status, retry_request};
use super::llm::{LlmProvider, TextStream};
use super::sse::text_stream;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::ChatMessage;

/// Groq client
pub struct GroqClient {
    client: Client,
    stream_client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_retries: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Parse one `data:` payload of a streamed completion
fn parse_delta(data: &str) -> Result<Option<String>> {
    if data == "[DONE]" {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(data)
        .map_err(|e| Error::llm(format!("Malformed Groq stream chunk: {}", e)))?;

    Ok(chunk.choices.into_iter().next().and_then(|c| c.delta.content))
}

impl GroqClient {
    /// Create a new Groq client. Fails without an API key.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("GROQ_API_KEY is not set".to_string()))?;

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            stream_client: build_streaming_client(config.timeout_secs)?,
            endpoint: format!("{}/chat/completions", config.base_url().trim_end_matches('/')),
            api_key,
            model: config.model_name().to_string(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    fn request<'a>(
        &'a self,
        system: Option<&'a str>,
        messages: &'a [ChatMessage],
        stream: bool,
    ) -> CompletionRequest<'a> {
        let system = system.map(|content| WireMessage {
            role: "system",
            content,
        });
        let history = messages.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        });

        CompletionRequest {
            model: &self.model,
            messages: system.into_iter().chain(history).collect(),
            temperature: self.temperature,
            stream,
        }
    }

    async fn send(&self, client: &Client, body: &CompletionRequest<'_>) -> Result<reqwest::Response> {
        retry_request(self.max_retries, "Groq completion", || async {
            let response = client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await
                .map_err(|e| Error::llm(format!("Groq request failed: {}", e)))?;
            check_status(response, "groq", Error::Llm).await
        })
        .await
    }
}

#[async_trait]
impl LlmProvider for GroqClient {
    async fn complete(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<String> {
        let body = self.request(system, messages, false);
        let response = self.send(&self.client, &body).await?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Groq response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::llm("No text in Groq response"))
    }

    async fn stream(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<TextStream> {
        let body = self.request(system, messages, true);
        let response = self.send(&self.stream_client, &body).await?;
        tracing::debug!("Groq stream opened for model {}", self.model);
        Ok(text_stream(response, "groq", parse_delta))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.api_key.is_empty())
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> LlmConfig {
        LlmConfig {
            base_url: Some(server.uri()),
            api_key: Some("gsk-test".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(
            parse_delta(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#).unwrap(),
            Some("Hel".to_string())
        );
        assert_eq!(parse_delta(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap(), None);
        assert_eq!(parse_delta("[DONE]").unwrap(), None);
        assert!(parse_delta("not json").is_err());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        assert!(matches!(GroqClient::new(&LlmConfig::default()), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_stream_puts_system_first() {
        let server = MockServer::start().await;
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer gsk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "stream": true,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hi"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse),
            )
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server)).unwrap();
        let stream = client
            .stream(Some("Be brief."), &[ChatMessage::user("Hi")])
            .await
            .unwrap();
        let parts: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(parts.concat(), "Hello there");
    }

    #[tokio::test]
    async fn test_rate_limit_before_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server)).unwrap();
        let result = client.stream(None, &[ChatMessage::user("Hi")]).await;
        assert!(matches!(result, Err(Error::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_stalled_stream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string("data: [DONE]\n\n")
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = GroqClient::new(&LlmConfig {
            timeout_secs: 1,
            max_retries: 0,
            ..config(&server)
        })
        .unwrap();

        let started = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.stream(None, &[ChatMessage::user("Hi")]),
        )
        .await
        .expect("stream() should give up on its own");

        assert!(matches!(result, Err(Error::Llm(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "42"}}]
            })))
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server)).unwrap();
        let answer = client.complete(None, &[ChatMessage::user("?")]).await.unwrap();
        assert_eq!(answer, "42");
    }
}
