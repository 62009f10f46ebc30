//! Rasterizing text signatures into bitmaps
//!
//! Signature fonts are arbitrary TrueType/OpenType files that are never
//! embedded in the output; the signature is drawn as an image instead.

use crate::constants::{TEXT_RASTER_SCALE, TEXT_SIGNATURE_H_PADDING};
use crate::fonts::FontData;
use crate::types::*;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::io::Cursor;

/// Turns a run of text into an encoded bitmap (PNG)
pub trait TextRasterizer: Send + Sync {
    /// Render `text` at `font_size` points. The bitmap is `padding` times the
    /// font size tall with the text vertically centered, and is drawn at a
    /// higher pixel density than the point size.
    fn rasterize(&self, text: &str, font_size: f32, color: Rgb, padding: f32) -> Result<Vec<u8>>;
}

/// [`TextRasterizer`] drawing with a font file through rusttype
pub struct FontFileRasterizer {
    font: Font<'static>,
}

impl FontFileRasterizer {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_font_data(FontData::new(bytes))
    }

    pub fn from_font_data(font: FontData) -> Result<Self> {
        let font = Font::try_from_vec_and_index(font.bytes, font.index)
            .ok_or_else(|| StampError::Raster("Unsupported font data".to_string()))?;
        Ok(Self { font })
    }

    /// Advance width of `text` at `scale`, in pixels
    fn measure(&self, text: &str, scale: Scale) -> f32 {
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

impl TextRasterizer for FontFileRasterizer {
    fn rasterize(&self, text: &str, font_size: f32, color: Rgb, padding: f32) -> Result<Vec<u8>> {
        if text.is_empty() {
            return Err(StampError::Raster("Nothing to rasterize".to_string()));
        }
        if !(font_size > 0.0) {
            return Err(StampError::Raster(format!("Invalid font size {}", font_size)));
        }

        let px = font_size * TEXT_RASTER_SCALE;
        let scale = Scale::uniform(px);
        let text_width = self.measure(text, scale);

        let width = (text_width + px * TEXT_SIGNATURE_H_PADDING).ceil().max(1.0) as u32;
        let height = (px * padding).ceil().max(1.0) as u32;

        // Center the em box: the baseline sits half the ascent+descent below the middle
        let v_metrics = self.font.v_metrics(scale);
        let baseline = height as f32 / 2.0 + (v_metrics.ascent + v_metrics.descent) / 2.0;
        let left = (width as f32 - text_width) / 2.0;

        let [r, g, b, _] = color.to_rgba8();
        let mut bitmap = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0]));

        for glyph in self.font.layout(text, scale, point(left, baseline)) {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = gx as i32 + bounds.min.x;
                let y = gy as i32 + bounds.min.y;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    return;
                }
                let pixel = bitmap.get_pixel_mut(x as u32, y as u32);
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                pixel.0[3] = pixel.0[3].max(alpha);
            });
        }

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(bitmap).write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}
