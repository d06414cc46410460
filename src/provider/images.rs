//! Image-search providers.
//!
//! [`IconifyProvider`] searches the Iconify catalogue, downloads the best
//! match as SVG and rasterises it to a square PNG. [`PexelsProvider`]
//! searches Pexels and downloads the medium-size rendition of the first
//! photo.

use async_trait::async_trait;
use image::DynamicImage;
use serde::Deserialize;

use crate::config::ImageConfig;
use crate::raster::{encode_png, rasterize_svg};

use super::{check_status, http_client, ProviderError};

// ---------------------------------------------------------------------------
// ImageAsset
// ---------------------------------------------------------------------------

/// A downloaded image, ready to be written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    /// File extension without the dot (`png`, `jpg`, ...).
    pub extension: String,
    /// File-name suffix identifying the source (`icon`, `photo`).
    pub kind: &'static str,
}

/// Async trait for services that turn a search term into an image.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    async fn fetch(&self, query: &str) -> Result<ImageAsset, ProviderError>;
}

// ---------------------------------------------------------------------------
// IconifyProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IconSearch {
    #[serde(default)]
    icons: Vec<String>,
}

/// Iconify vector-icon search. Icons are stored as `size`×`size` PNG.
pub struct IconifyProvider {
    client: reqwest::Client,
    base_url: String,
    size: u32,
}

impl IconifyProvider {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.iconify_url.trim_end_matches('/').to_string(),
            size: config.icon_size,
        }
    }
}

#[async_trait]
impl ImageProvider for IconifyProvider {
    fn name(&self) -> &str {
        "iconify"
    }

    async fn fetch(&self, query: &str) -> Result<ImageAsset, ProviderError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("query", query), ("limit", "1")])
            .send()
            .await?;

        let search: IconSearch = check_status(response)?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let icon = search
            .icons
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoResults(query.to_string()))?;

        let size = self.size.to_string();
        let response = self
            .client
            .get(format!("{}/{}.svg", self.base_url, icon))
            .query(&[("height", size.as_str()), ("width", size.as_str())])
            .send()
            .await?;

        let svg = check_status(response)?.bytes().await?;
        if !looks_like_svg(&svg) {
            return Err(ProviderError::Parse(format!("icon {icon} is not SVG")));
        }

        let png = rasterize_svg(&svg, self.size, self.size)
            .and_then(|img| encode_png(&DynamicImage::ImageRgba8(img)))
            .map_err(|e| ProviderError::Raster(format!("icon {icon}: {e}")))?;

        log::debug!("iconify: {query:?} -> {icon}");
        Ok(ImageAsset {
            bytes: png,
            extension: "png".into(),
            kind: "icon",
        })
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    String::from_utf8_lossy(head).contains("<svg")
}

// ---------------------------------------------------------------------------
// PexelsProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PhotoSearch {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    medium: String,
}

/// Pexels stock-photo search. Skipped when no API key is configured.
pub struct PexelsProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PexelsProvider {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.pexels_url.trim_end_matches('/').to_string(),
            api_key: config.pexels_api_key.clone().filter(|k| !k.is_empty()),
        }
    }
}

#[async_trait]
impl ImageProvider for PexelsProvider {
    fn name(&self) -> &str {
        "pexels"
    }

    async fn fetch(&self, query: &str) -> Result<ImageAsset, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("Pexels API key"))?;

        let response = self
            .client
            .get(format!("{}/v1/search", self.base_url))
            .header(reqwest::header::AUTHORIZATION, key)
            .query(&[("query", query), ("per_page", "1"), ("size", "medium")])
            .send()
            .await?;

        let search: PhotoSearch = check_status(response)?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let photo = search
            .photos
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoResults(query.to_string()))?;

        let response = self.client.get(&photo.src.medium).send().await?;
        let bytes = check_status(response)?.bytes().await?;

        let format = image::guess_format(&bytes)
            .map_err(|e| ProviderError::Parse(format!("photo is not an image: {e}")))?;
        let extension = format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("img")
            .to_string();

        Ok(ImageAsset {
            bytes: bytes.to_vec(),
            extension,
            kind: "photo",
        })
    }
}
