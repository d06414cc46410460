//! Raster helpers shared by the icon provider and the placeholder renderer.
//!
//! SVG documents are rendered with `resvg` onto a square or rectangular
//! canvas and handed back as [`RgbaImage`]s; [`encode_png`] turns any image
//! into PNG bytes. Text in SVG is shaped with the system fonts, loaded once
//! per process.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("cannot allocate a {0}x{1} canvas")]
    Canvas(u32, u32),

    #[error("cannot encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System font faces, with `sans-serif` pointed at an installed family.
///
/// Empty on hosts without fonts; text then renders as nothing.
pub fn fonts() -> Arc<fontdb::Database> {
    Arc::clone(FONTS.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let families: Vec<String> = db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        let preferred = families
            .iter()
            .find(|name| name.contains("Sans") && !name.contains("Mono"))
            .or_else(|| families.first());
        match preferred {
            Some(family) => {
                log::debug!("raster: {} font faces, sans-serif = {family}", db.len());
                db.set_sans_serif_family(family.clone());
            }
            None => log::warn!("raster: no system fonts found; captions will be blank"),
        }
        Arc::new(db)
    }))
}

// ---------------------------------------------------------------------------
// SVG
// ---------------------------------------------------------------------------

/// Render `svg` scaled uniformly to fit a `width`×`height` canvas, centred.
///
/// Areas the document does not cover stay transparent.
pub fn rasterize_svg(svg: &[u8], width: u32, height: u32) -> Result<RgbaImage, RasterError> {
    let mut options = usvg::Options::default();
    options.fontdb = fonts();
    let tree = usvg::Tree::from_data(svg, &options)?;

    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Canvas(width, height))?;
    let size = tree.size();
    let scale = (width as f32 / size.width()).min(height as f32 / size.height());
    let dx = (width as f32 - size.width() * scale) / 2.0;
    let dy = (height as f32 - size.height() * scale) / 2.0;
    resvg::render(
        &tree,
        Transform::from_row(scale, 0.0, 0.0, scale, dx, dy),
        &mut pixmap.as_mut(),
    );

    let pixels = pixmap.pixels();
    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    }))
}

/// Escape text for use inside SVG element content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

/// Encode as PNG in memory.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, RasterError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
