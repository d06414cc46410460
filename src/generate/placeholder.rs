//! Locally rendered placeholder image, the last resort of the image chain.
//!
//! Layout (400×300): palette background keyed by the translation's first
//! letter, a lighter checker pattern, two white dots in opposite corners,
//! the word in white and `(translation)` in smaller light grey below it.
//! The picture is composed as an SVG document and rasterised, so captions
//! are set in a proportional system font.

use std::fmt::Write as _;

use image::{DynamicImage, Rgb, RgbImage};

use crate::raster::{escape_xml, rasterize_svg, RasterError};

pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 300;

const PALETTE: [Rgb<u8>; 6] = [
    Rgb([52, 152, 219]),  // blue
    Rgb([46, 204, 113]),  // green
    Rgb([155, 89, 182]),  // purple
    Rgb([241, 196, 15]),  // yellow
    Rgb([230, 126, 34]),  // orange
    Rgb([231, 76, 60]),   // red
];

const LIGHT_GRAY: Rgb<u8> = Rgb([211, 211, 211]);

const MARGIN: u32 = 20;
/// Caption baselines.
const WORD_BASELINE: u32 = 146;
const TRANSLATION_BASELINE: u32 = 200;
const WORD_SIZE: f32 = 32.0;
const TRANSLATION_SIZE: f32 = 24.0;
/// Rough advance of one character, in ems, for shrink-to-fit.
const AVERAGE_ADVANCE: f32 = 0.6;

/// Background colour for a translation: lowercased first code point modulo
/// the palette size. An empty translation gets the first colour.
pub fn palette_color(translation: &str) -> Rgb<u8> {
    let index = translation
        .chars()
        .next()
        .and_then(|c| c.to_lowercase().next())
        .map_or(0, |c| c as usize % PALETTE.len());
    PALETTE[index]
}

/// Render the placeholder.
pub fn render_placeholder(word: &str, translation: &str) -> Result<RgbImage, RasterError> {
    let svg = placeholder_svg(word, translation);
    let img = rasterize_svg(svg.as_bytes(), WIDTH, HEIGHT)?;
    Ok(DynamicImage::ImageRgba8(img).to_rgb8())
}

/// The placeholder as an SVG document.
fn placeholder_svg(word: &str, translation: &str) -> String {
    let background = palette_color(translation);
    let lighter = Rgb(background.0.map(|c| c.saturating_add(30)));

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    // Writing into a String cannot fail.
    let _ = write!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="{}"/>"#, css(background));
    for x in (0..WIDTH).step_by(20) {
        for y in (0..HEIGHT).step_by(20) {
            if (x + y) % 40 == 0 {
                let _ = write!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="11" height="11" fill="{}"/>"#,
                    css(lighter)
                );
            }
        }
    }
    svg.push_str(r#"<circle cx="65" cy="65" r="15" fill="white"/>"#);
    svg.push_str(r#"<circle cx="335" cy="235" r="15" fill="white"/>"#);

    caption(&mut svg, word, WORD_BASELINE, WORD_SIZE, Rgb([255, 255, 255]));
    if !translation.is_empty() {
        caption(
            &mut svg,
            &format!("({translation})"),
            TRANSLATION_BASELINE,
            TRANSLATION_SIZE,
            LIGHT_GRAY,
        );
    }

    svg.push_str("</svg>");
    svg
}

fn caption(svg: &mut String, text: &str, baseline: u32, max_size: f32, color: Rgb<u8>) {
    let _ = write!(
        svg,
        r#"<text x="{}" y="{baseline}" text-anchor="middle" font-family="sans-serif" font-size="{:.1}" fill="{}">{}</text>"#,
        WIDTH / 2,
        fit_font_size(text, max_size),
        css(color),
        escape_xml(text)
    );
}

/// Largest size up to `max_size` at which `text` roughly fits between the
/// margins.
fn fit_font_size(text: &str, max_size: f32) -> f32 {
    let available = (WIDTH - 2 * MARGIN) as f32;
    let chars = text.chars().count().max(1) as f32;
    (available / (chars * AVERAGE_ADVANCE)).min(max_size)
}

fn css(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("rgb({r},{g},{b})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{encode_png, fonts};

    #[test]
    fn palette_is_keyed_by_first_letter() {
        // 'h' = 104, 104 % 6 = 2 → purple
        assert_eq!(palette_color("house"), PALETTE[2]);
        assert_eq!(palette_color("House"), palette_color("house"));
        // 'a' = 97, 97 % 6 = 1 → green
        assert_eq!(palette_color("apple"), PALETTE[1]);
        assert_eq!(palette_color(""), PALETTE[0]);
    }

    #[test]
    fn renders_fixed_size_with_background() {
        let img = render_placeholder("Haus", "house").unwrap();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        // (395, 15) lies outside every checker square, dot and caption.
        assert_eq!(*img.get_pixel(395, 15), palette_color("house"));
        // Checker squares are lighter.
        assert_eq!(*img.get_pixel(5, 5), Rgb([185, 119, 212]));
        assert_eq!(*img.get_pixel(65, 65), Rgb([255, 255, 255]));
    }

    #[test]
    fn captions_are_drawn_when_fonts_exist() {
        if fonts().is_empty() {
            return;
        }
        let img = render_placeholder("Haus", "house").unwrap();
        // The purple background never gets this bright in green.
        let bright = |top: u32, bottom: u32| {
            (top..bottom)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| img.get_pixel(x, y).0[1] > 180)
                .count()
        };
        assert!(bright(WORD_BASELINE - 30, WORD_BASELINE + 4) > 0);
        assert!(bright(TRANSLATION_BASELINE - 22, TRANSLATION_BASELINE + 6) > 0);
    }

    #[test]
    fn caption_text_is_escaped() {
        let svg = placeholder_svg("<Tür & Tor>", "gate");
        assert!(svg.contains("&lt;Tür &amp; Tor&gt;"));
        assert!(svg.contains("(gate)"));
        assert!(render_placeholder("<Tür & Tor>", "gate").is_ok());
    }

    #[test]
    fn missing_translation_has_no_second_caption() {
        let svg = placeholder_svg("Haus", "");
        assert_eq!(svg.matches("<text").count(), 1);
    }

    #[test]
    fn long_words_shrink_to_fit() {
        assert_eq!(fit_font_size("Haus", WORD_SIZE), WORD_SIZE);
        assert!(fit_font_size(&"x".repeat(40), WORD_SIZE) < WORD_SIZE);
        let word = "Donaudampfschifffahrtsgesellschaftskapitän".repeat(3);
        let img = render_placeholder(&word, "captain").unwrap();
        assert_eq!(img.width(), WIDTH);
    }

    #[test]
    fn encodes_as_png() {
        let img = render_placeholder("Baum", "tree").unwrap();
        let bytes = encode_png(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    }
}
