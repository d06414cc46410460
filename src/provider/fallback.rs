//! Fallback chains: ordered provider lists tried until one succeeds.
//!
//! [`SpeechChain`] and [`ImageChain`] implement the same trait as their
//! members, so a generator holds one provider regardless of how many
//! services stand behind it. Each failure is logged with `warn!` before the
//! next provider is tried; when every member fails the chain returns
//! [`ProviderError::Exhausted`] carrying the last error.

use async_trait::async_trait;

use super::images::{ImageAsset, ImageProvider};
use super::speech::SpeechProvider;
use super::ProviderError;

// ---------------------------------------------------------------------------
// SpeechChain
// ---------------------------------------------------------------------------

/// Speech providers in priority order.
pub struct SpeechChain {
    providers: Vec<Box<dyn SpeechProvider>>,
}

impl SpeechChain {
    pub fn new(providers: Vec<Box<dyn SpeechProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl SpeechProvider for SpeechChain {
    fn name(&self) -> &str {
        "speech-chain"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let mut last = ProviderError::NotConfigured("speech provider");
        for provider in &self.providers {
            match provider.synthesize(text).await {
                Ok(audio) => {
                    log::debug!("{}: synthesized {:?} ({} bytes)", provider.name(), text, audio.len());
                    return Ok(audio);
                }
                Err(e) => {
                    log::warn!("{}: speech synthesis failed for {:?}: {e}", provider.name(), text);
                    last = e;
                }
            }
        }
        Err(ProviderError::Exhausted {
            attempts: self.providers.len(),
            last: last.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// ImageChain
// ---------------------------------------------------------------------------

/// Image providers in priority order.
pub struct ImageChain {
    providers: Vec<Box<dyn ImageProvider>>,
}

impl ImageChain {
    pub fn new(providers: Vec<Box<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl ImageProvider for ImageChain {
    fn name(&self) -> &str {
        "image-chain"
    }

    async fn fetch(&self, query: &str) -> Result<ImageAsset, ProviderError> {
        let mut last = ProviderError::NotConfigured("image provider");
        for provider in &self.providers {
            match provider.fetch(query).await {
                Ok(asset) => return Ok(asset),
                Err(e) => {
                    log::warn!("{}: image search failed for {:?}: {e}", provider.name(), query);
                    last = e;
                }
            }
        }
        Err(ProviderError::Exhausted {
            attempts: self.providers.len(),
            last: last.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed payload and counts calls.
    struct FixedSpeech(&'static [u8], Arc<AtomicUsize>);

    #[async_trait]
    impl SpeechProvider for FixedSpeech {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, ProviderError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(self.0.to_vec())
        }
    }

    struct FailingSpeech(Arc<AtomicUsize>);

    #[async_trait]
    impl SpeechProvider for FailingSpeech {
        fn name(&self) -> &str {
            "failing"
        }
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, ProviderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Timeout)
        }
    }

    struct FailingImages;

    #[async_trait]
    impl ImageProvider for FailingImages {
        fn name(&self) -> &str {
            "failing"
        }
        async fn fetch(&self, query: &str) -> Result<ImageAsset, ProviderError> {
            Err(ProviderError::NoResults(query.into()))
        }
    }

    struct FixedImage;

    #[async_trait]
    impl ImageProvider for FixedImage {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn fetch(&self, _query: &str) -> Result<ImageAsset, ProviderError> {
            Ok(ImageAsset {
                bytes: b"<svg/>".to_vec(),
                extension: "svg".into(),
                kind: "icon",
            })
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn first_success_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let chain = SpeechChain::new(vec![
            Box::new(FixedSpeech(b"primary", Arc::clone(&first))),
            Box::new(FixedSpeech(b"secondary", Arc::clone(&second))),
        ]);

        assert_eq!(chain.synthesize("Haus").await.unwrap(), b"primary");
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_to_secondary() {
        let failed = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let chain = SpeechChain::new(vec![
            Box::new(FailingSpeech(Arc::clone(&failed))),
            Box::new(FixedSpeech(b"secondary", Arc::clone(&second))),
        ]);

        assert_eq!(chain.synthesize("Haus").await.unwrap(), b"secondary");
        assert_eq!(failed.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_failing_is_exhausted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = SpeechChain::new(vec![
            Box::new(FailingSpeech(Arc::clone(&calls))),
            Box::new(FailingSpeech(Arc::clone(&calls))),
        ]);

        let err = chain.synthesize("Haus").await.unwrap_err();
        assert!(matches!(err, ProviderError::Exhausted { attempts: 2, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_chain_is_exhausted() {
        let chain = ImageChain::new(Vec::new());
        assert!(chain.is_empty());
        let err = chain.fetch("house").await.unwrap_err();
        assert!(matches!(err, ProviderError::Exhausted { attempts: 0, .. }));
    }

    #[tokio::test]
    async fn image_chain_skips_failures() {
        let chain = ImageChain::new(vec![Box::new(FailingImages), Box::new(FixedImage)]);
        assert_eq!(chain.len(), 2);
        let asset = chain.fetch("house").await.unwrap();
        assert_eq!(asset.kind, "icon");
    }

    #[test]
    fn chains_are_object_safe() {
        let _: Box<dyn SpeechProvider> = Box::new(SpeechChain::new(Vec::new()));
        let _: Box<dyn ImageProvider> = Box::new(ImageChain::new(Vec::new()));
    }
}
