//! Speech-synthesis providers.
//!
//! Both providers return the raw audio payload (MP3); writing it to disk is
//! the audio generator's job.

use async_trait::async_trait;

use crate::config::SpeechConfig;

use super::{check_status, http_client, ProviderError};

/// Async trait for text-to-speech services.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Synthesize `text`, returning a non-empty audio payload.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError>;
}

// ---------------------------------------------------------------------------
// OpenAiSpeech
// ---------------------------------------------------------------------------

/// OpenAI-compatible `/v1/audio/speech` endpoint with voice and rate control.
pub struct OpenAiSpeech {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    voice: String,
    speed: f32,
}

impl OpenAiSpeech {
    /// `api_key` is shared with the text provider; requests are not attempted
    /// without one.
    pub fn from_config(config: &SpeechConfig, api_key: Option<String>) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model: config.model.clone(),
            voice: config.voice.clone(),
            speed: config.speed,
        }
    }
}

#[async_trait]
impl SpeechProvider for OpenAiSpeech {
    fn name(&self) -> &str {
        "openai-tts"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("OpenAI speech API key"))?;

        let body = serde_json::json!({
            "model":           self.model,
            "voice":           self.voice,
            "input":           text,
            "speed":           self.speed,
            "response_format": "mp3"
        });

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let bytes = check_status(response)?.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// GoogleTranslateSpeech
// ---------------------------------------------------------------------------

/// Google Translate's public TTS endpoint. Lower quality, no rate control,
/// no credential.
pub struct GoogleTranslateSpeech {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl GoogleTranslateSpeech {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.fallback_url.trim_end_matches('/').to_string(),
            language: config.fallback_language.clone(),
        }
    }
}

#[async_trait]
impl SpeechProvider for GoogleTranslateSpeech {
    fn name(&self) -> &str {
        "google-tts"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/translate_tts", self.base_url))
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .send()
            .await?;

        let bytes = check_status(response)?.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base: &str) -> SpeechConfig {
        SpeechConfig {
            base_url: base.into(),
            fallback_url: base.into(),
            timeout_secs: 5,
            ..SpeechConfig::default()
        }
    }

    #[tokio::test]
    async fn openai_sends_voice_and_speed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "tts-1",
                "voice": "alloy",
                "input": "Haus"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let tts = OpenAiSpeech::from_config(&config(&server.uri()), Some("sk-test".into()));
        let audio = tts.synthesize("Haus").await.unwrap();
        assert_eq!(audio, b"ID3audio");
    }

    #[tokio::test]
    async fn openai_without_key_is_not_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tts = OpenAiSpeech::from_config(&config(&server.uri()), Some(String::new()));
        let err = tts.synthesize("Haus").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn google_passes_language_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "de"))
            .and(query_param("q", "Straße"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xFB, 0x90, 0x00]))
            .mount(&server)
            .await;

        let tts = GoogleTranslateSpeech::from_config(&config(&server.uri()));
        let audio = tts.synthesize("Straße").await.unwrap();
        assert_eq!(audio.len(), 4);
    }

    #[tokio::test]
    async fn empty_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let tts = GoogleTranslateSpeech::from_config(&config(&server.uri()));
        let err = tts.synthesize("Haus").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }
}
