//! Illustration generator.
//!
//! Searches the image providers with the row's translation and stores the
//! first hit. When every provider fails, a placeholder is rendered locally,
//! so the field only fails for a row without a word or when nothing can be
//! written to disk.

use std::path::PathBuf;

use async_trait::async_trait;
use image::DynamicImage;

use crate::provider::ImageProvider;
use crate::raster::encode_png;
use crate::table::Entry;

use super::artifact::{artifact_path, write_artifact};
use super::placeholder::render_placeholder;
use super::{FieldGenerator, GenerationError};

pub struct ImageGenerator {
    dir: PathBuf,
    images: Box<dyn ImageProvider>,
}

impl ImageGenerator {
    pub fn new(dir: PathBuf, images: Box<dyn ImageProvider>) -> Self {
        Self { dir, images }
    }

    async fn try_providers(&self, entry: &Entry<'_>) -> Result<PathBuf, GenerationError> {
        let query = if entry.translation.is_empty() {
            entry.word
        } else {
            entry.translation
        };
        let asset = self.images.fetch(query).await?;
        let path = artifact_path(&self.dir, entry.word, asset.kind, &asset.extension);
        write_artifact(&path, &asset.bytes)?;
        log::info!(
            "image: {} from {} ({} bytes)",
            path.display(),
            self.images.name(),
            asset.bytes.len()
        );
        Ok(path)
    }

    fn write_placeholder(&self, entry: &Entry<'_>) -> Result<PathBuf, GenerationError> {
        let png = render_placeholder(entry.word, entry.translation)
            .and_then(|img| encode_png(&DynamicImage::ImageRgb8(img)))
            .map_err(|e| GenerationError::Encode(e.to_string()))?;
        let path = artifact_path(&self.dir, entry.word, "designed", "png");
        write_artifact(&path, &png)?;
        log::info!("image: placeholder {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl FieldGenerator for ImageGenerator {
    async fn generate(&self, entry: &Entry<'_>) -> Result<String, GenerationError> {
        if entry.word.trim().is_empty() {
            return Err(GenerationError::EmptyResult);
        }
        let path = match self.try_providers(entry).await {
            Ok(path) => path,
            Err(e) => {
                log::warn!("image: no provider image for '{}': {e}", entry.word);
                self.write_placeholder(entry)?
            }
        };
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ImageAsset, ImageChain, ProviderError};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Answers with a fixed result and records the queries it saw.
    struct FixedImages {
        result: Result<ImageAsset, ProviderError>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl FixedImages {
        fn boxed(result: Result<ImageAsset, ProviderError>) -> Box<Self> {
            Box::new(Self {
                result,
                queries: Arc::default(),
            })
        }
    }

    #[async_trait]
    impl ImageProvider for FixedImages {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn fetch(&self, query: &str) -> Result<ImageAsset, ProviderError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone()
        }
    }

    const ENTRY: Entry<'static> = Entry {
        word: "der Baum",
        translation: "tree",
        level: "A1",
    };

    #[tokio::test]
    async fn stores_icon_from_first_provider() {
        let dir = tempdir().unwrap();
        let png = crate::raster::encode_png(&DynamicImage::new_rgba8(300, 300)).unwrap();
        let icon = ImageAsset {
            bytes: png.clone(),
            extension: "png".into(),
            kind: "icon",
        };
        let gen = ImageGenerator::new(dir.path().to_path_buf(), FixedImages::boxed(Ok(icon)));

        let stored = gen.generate(&ENTRY).await.unwrap();
        let expected = dir.path().join("der_Baum_icon.png");
        assert_eq!(PathBuf::from(stored), expected);
        assert_eq!(std::fs::read(expected).unwrap(), png);
    }

    #[tokio::test]
    async fn blank_word_is_rejected_without_searching() {
        let dir = tempdir().unwrap();
        let provider = FixedImages::boxed(Err(ProviderError::Timeout));
        let queries = Arc::clone(&provider.queries);
        let gen = ImageGenerator::new(dir.path().join("images"), provider);

        let blank = Entry {
            word: "  ",
            ..ENTRY
        };
        let err = gen.generate(&blank).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResult));
        assert!(queries.lock().unwrap().is_empty());
        assert!(!dir.path().join("images").exists());
    }

    #[tokio::test]
    async fn placeholder_when_every_provider_fails() {
        let dir = tempdir().unwrap();
        let chain = ImageChain::new(vec![
            FixedImages::boxed(Err(ProviderError::NoResults("tree".into()))),
            FixedImages::boxed(Err(ProviderError::NotConfigured("pexels api key"))),
        ]);
        let gen = ImageGenerator::new(dir.path().join("images"), Box::new(chain));

        let stored = gen.generate(&ENTRY).await.unwrap();
        let expected = dir.path().join("images").join("der_Baum_designed.png");
        assert_eq!(PathBuf::from(stored), expected);

        let bytes = std::fs::read(expected).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));
    }

    #[tokio::test]
    async fn searches_by_translation_or_word() {
        let dir = tempdir().unwrap();
        let provider = FixedImages::boxed(Err(ProviderError::Timeout));
        let queries = Arc::clone(&provider.queries);
        let gen = ImageGenerator::new(dir.path().to_path_buf(), provider);

        gen.generate(&ENTRY).await.unwrap();
        let untranslated = Entry {
            translation: "",
            ..ENTRY
        };
        gen.generate(&untranslated).await.unwrap();

        let seen = queries.lock().unwrap().clone();
        assert_eq!(seen, vec!["tree".to_string(), "der Baum".to_string()]);
    }

    #[tokio::test]
    async fn unwritable_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let gen = ImageGenerator::new(
            blocker.join("images"),
            FixedImages::boxed(Err(ProviderError::Timeout)),
        );

        let err = gen.generate(&ENTRY).await.unwrap_err();
        assert!(matches!(err, GenerationError::Io { .. }));
    }
}
