//! External-service clients used by the generators.
//!
//! This module provides:
//! * [`TextProvider`] / [`OpenAiChat`]: OpenAI-compatible chat completions.
//! * [`SpeechProvider`] / [`OpenAiSpeech`] / [`GoogleTranslateSpeech`]:
//!   speech synthesis returning raw audio bytes.
//! * [`ImageProvider`] / [`IconifyProvider`] / [`PexelsProvider`]: icon and
//!   photo search returning raw image bytes.
//! * [`SpeechChain`] / [`ImageChain`]: ordered fallback lists that are
//!   themselves providers.
//! * [`ProviderError`]: error variants shared by every client.
//!
//! All connection details come from [`crate::config`]; nothing is hardcoded
//! apart from the defaults there.

pub mod fallback;
pub mod images;
pub mod speech;
pub mod text;

use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fallback::{ImageChain, SpeechChain};
pub use images::{IconifyProvider, ImageAsset, ImageProvider, PexelsProvider};
pub use speech::{GoogleTranslateSpeech, OpenAiSpeech, SpeechProvider};
pub use text::{ChatRequest, OpenAiChat, TextProvider};

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to an external service.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status code.
    #[error("service returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed as expected.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The response carried no usable content.
    #[error("service returned an empty response")]
    EmptyResponse,

    /// A downloaded vector image could not be converted to raster.
    #[error("cannot rasterise image: {0}")]
    Raster(String),

    /// A search returned no hits.
    #[error("no results for {0:?}")]
    NoResults(String),

    /// The provider lacks a credential and was skipped.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Every provider in a fallback chain failed.
    #[error("all {attempts} provider(s) failed; last error: {last}")]
    Exhausted { attempts: usize, last: String },
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if let Some(status) = e.status() {
            ProviderError::Status(status.as_u16())
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

/// Build an HTTP client with a per-request timeout.
///
/// A default client is used as a last resort if the builder fails.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("vocab-enricher/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a non-success status to [`ProviderError::Status`].
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ProviderError::Status(status.as_u16()))
    }
}
