//! Google Gemini client (Generative Language API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{build_client, build_streaming_client, check_status, retry_request};
use super::llm::{LlmProvider, TextStream};
use super::sse::text_stream;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::{ChatMessage, Role};

/// Gemini client authenticated with an API key
pub struct GeminiClient {
    client: Client,
    stream_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_retries: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
    }
}

/// Parse one `data:` payload of `streamGenerateContent?alt=sse`
fn parse_delta(data: &str) -> Result<Option<String>> {
    let chunk: GenerateResponse = serde_json::from_str(data)
        .map_err(|e| Error::llm(format!("Malformed Gemini stream chunk: {}", e)))?;
    Ok(chunk.text())
}

impl GeminiClient {
    /// Create a new Gemini client. Fails without an API key.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            stream_client: build_streaming_client(config.timeout_secs)?,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key,
            model: config.model_name().to_string(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    /// Gemini has no system role in `contents`; system text goes into
    /// `systemInstruction` and assistant turns are sent as `model`.
    fn request(&self, system: Option<&str>, messages: &[ChatMessage]) -> GenerateRequest {
        let mut instructions: Vec<&str> = system.into_iter().collect();
        let mut contents = Vec::with_capacity(messages.len());

        for message in messages {
            let role = match message.role {
                Role::System => {
                    instructions.push(&message.content);
                    continue;
                }
                Role::User => "user",
                Role::Assistant => "model",
            };
            contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            });
        }

        let system_instruction = (!instructions.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: instructions.join("\n\n"),
            }],
        });

        GenerateRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    async fn send(
        &self,
        client: &Client,
        url: &str,
        query: &[(&str, &str)],
        body: &GenerateRequest,
    ) -> Result<reqwest::Response> {
        retry_request(self.max_retries, "Gemini generation", || async {
            let response = client
                .post(url)
                .query(query)
                .json(body)
                .send()
                .await
                .map_err(|e| Error::llm(format!("Gemini request failed: {}", e)))?;
            check_status(response, "gemini", Error::Llm).await
        })
        .await
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn complete(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<String> {
        let body = self.request(system, messages);
        let url = self.endpoint("generateContent");
        let response = self
            .send(&self.client, &url, &[("key", self.api_key.as_str())], &body)
            .await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Gemini response: {}", e)))?;

        parsed
            .text()
            .ok_or_else(|| Error::llm("No text in Gemini response"))
    }

    async fn stream(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<TextStream> {
        let body = self.request(system, messages);
        let url = self.endpoint("streamGenerateContent");
        let query = [("alt", "sse"), ("key", self.api_key.as_str())];
        let response = self.send(&self.stream_client, &url, &query, &body).await?;
        tracing::debug!("Gemini stream opened for model {}", self.model);
        Ok(text_stream(response, "gemini", parse_delta))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.api_key.is_empty())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProviderKind;
    use futures::TryStreamExt;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> LlmConfig {
        LlmConfig {
            provider: LlmProviderKind::Gemini,
            base_url: Some(server.uri()),
            api_key: Some("gm-test".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_request_maps_roles() {
        let client = GeminiClient::new(&LlmConfig {
            provider: LlmProviderKind::Gemini,
            api_key: Some("k".to_string()),
            ..LlmConfig::default()
        })
        .unwrap();

        let messages = vec![
            ChatMessage::new(Role::System, "Extra rule."),
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello"),
            ChatMessage::user("What is RAG?"),
        ];
        let json = serde_json::to_value(client.request(Some("Use the context."), &messages)).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "Use the context.\n\nExtra rule."
        );
        let roles: Vec<&str> = json["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
    }

    #[tokio::test]
    async fn test_stream() {
        let server = MockServer::start().await;
        let sse = concat!(
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Retrieval\"}]}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"-Augmented\"}]}}]}\r\n\r\n",
        );
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:streamGenerateContent"))
            .and(query_param("alt", "sse"))
            .and(query_param("key", "gm-test"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Expand RAG"}]}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config(&server)).unwrap();
        let stream = client.stream(None, &[ChatMessage::user("Expand RAG")]).await.unwrap();
        let text: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(text.concat(), "Retrieval-Augmented");
    }

    #[tokio::test]
    async fn test_complete_and_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Yes."}]}}]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&config(&server)).unwrap();
        assert_eq!(client.complete(None, &[ChatMessage::user("?")]).await.unwrap(), "Yes.");

        let broken = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&broken)
            .await;
        let client = GeminiClient::new(&config(&broken)).unwrap();
        assert!(matches!(
            client.complete(None, &[ChatMessage::user("?")]).await,
            Err(Error::Llm(_))
        ));
    }
}
