//! Core `TextProvider` trait and `OpenAiChat` implementation.
//!
//! `OpenAiChat` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! (OpenAI, Ollama in OpenAI mode, Groq, LM Studio, vLLM, ...).

use async_trait::async_trait;

use crate::config::LlmConfig;

use super::{check_status, http_client, ProviderError};

// ---------------------------------------------------------------------------
// ChatRequest
// ---------------------------------------------------------------------------

/// A single-turn chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System-role instructions.
    pub system: String,
    /// User prompt.
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ---------------------------------------------------------------------------
// TextProvider trait
// ---------------------------------------------------------------------------

/// Async trait for free-text completion services.
///
/// Implementations return the trimmed completion text and never an empty
/// string: an empty completion is [`ProviderError::EmptyResponse`].
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError>;
}

// ---------------------------------------------------------------------------
// OpenAiChat
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiChat {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiChat {
    /// Build a client from config; the HTTP timeout is `config.timeout_secs`.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl TextProvider for OpenAiChat {
    /// The `Authorization: Bearer ...` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user",   "content": request.user   }
            ],
            "stream":      false,
            "temperature": request.temperature,
            "max_tokens":  request.max_tokens
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = check_status(req.send().await?)?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ProviderError::EmptyResponse)?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(base_url: String, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url,
            api_key: api_key.map(|s| s.to_string()),
            model: "gpt-4o-mini".into(),
            timeout_secs: 5,
        }
    }

    fn request() -> ChatRequest {
        ChatRequest {
            system: "You are a teacher.".into(),
            user: "Write a sentence.".into(),
            temperature: 0.3,
            max_tokens: 150,
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": content } } ]
        })
    }

    #[tokio::test]
    async fn returns_trimmed_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 150
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Das Haus ist groß.\n")))
            .expect(1)
            .mount(&server)
            .await;

        let chat = OpenAiChat::from_config(&make_config(server.uri(), Some("sk-test")));
        let text = chat.complete(&request()).await.unwrap();
        assert_eq!(text, "Das Haus ist groß.");
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
            .mount(&server)
            .await;

        let chat = OpenAiChat::from_config(&make_config(server.uri(), None));
        let err = chat.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn http_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let chat = OpenAiChat::from_config(&make_config(server.uri(), None));
        let err = chat.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(429)));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let chat = OpenAiChat::from_config(&make_config(server.uri(), None));
        let err = chat.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn provider_is_object_safe() {
        let chat: Box<dyn TextProvider> = Box::new(OpenAiChat::from_config(&make_config(
            "http://localhost:1".into(),
            None,
        )));
        drop(chat);
    }
}
