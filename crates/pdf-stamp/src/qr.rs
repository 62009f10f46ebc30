//! QR code bitmaps

use crate::constants::QR_QUIET_ZONE_MODULES;
use crate::types::*;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use std::io::Cursor;

/// Produces an encoded bitmap (PNG) for a QR payload
pub trait QrGenerator: Send + Sync {
    /// Render `data` as a square PNG roughly `size_px` pixels wide
    fn generate(&self, data: &str, size_px: u32) -> Result<Vec<u8>>;
}

/// [`QrGenerator`] backed by the `qrcode` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeGenerator;

impl QrGenerator for QrCodeGenerator {
    fn generate(&self, data: &str, size_px: u32) -> Result<Vec<u8>> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| StampError::Qr(e.to_string()))?;
        let bitmap = render_modules(&code.to_colors(), code.width(), size_px);

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(bitmap).write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Paint dark modules onto a white square with a quiet zone.
/// Module size is a whole number of pixels, so the result can be slightly
/// smaller than `size_px` but never blurry.
fn render_modules(colors: &[Color], modules: usize, size_px: u32) -> GrayImage {
    let quiet = QR_QUIET_ZONE_MODULES as u32;
    let total = modules as u32 + 2 * quiet;
    let scale = (size_px / total).max(1);
    let side = total * scale;

    let mut bitmap = GrayImage::from_pixel(side, side, Luma([255]));
    for (index, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = (index % modules) as u32 + quiet;
        let my = (index / modules) as u32 + quiet;
        for y in my * scale..(my + 1) * scale {
            for x in mx * scale..(mx + 1) * scale {
                bitmap.put_pixel(x, y, Luma([0]));
            }
        }
    }
    bitmap
}
