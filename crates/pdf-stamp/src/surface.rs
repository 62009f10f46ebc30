//! Drawing capability consumed by the stamper
//!
//! The stamper never touches a PDF library directly. It asks a
//! [`StampSurface`] for page geometry, embeds images through it and issues
//! absolute draw calls in native page coordinates.

use crate::layout::{ImageHandle, NativeAnchor, PageGeometry};
use crate::types::{FontWeight, Result, Rgb};

/// Parameters of an image draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDraw {
    pub anchor: NativeAnchor,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
}

/// Parameters of a text draw call. The anchor is the start of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw<'a> {
    pub text: &'a str,
    pub weight: FontWeight,
    pub font_size: f32,
    pub anchor: NativeAnchor,
    pub color: Rgb,
    pub opacity: f32,
}

/// A paged document that can be stamped
pub trait StampSurface {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Native size and rotation of a page
    fn page_geometry(&self, page_index: usize) -> Result<PageGeometry>;

    /// Embed an encoded bitmap (PNG, JPEG, ...) for later drawing
    fn embed_image(&mut self, bytes: &[u8]) -> Result<ImageHandle>;

    /// Width of `text` in points, using the fonts `draw_text` draws with
    fn text_width(&self, text: &str, weight: FontWeight, font_size: f32) -> f32;

    /// Draw an embedded image on a page
    fn draw_image(&mut self, page_index: usize, image: &ImageHandle, draw: ImageDraw) -> Result<()>;

    /// Draw a run of text on a page
    fn draw_text(&mut self, page_index: usize, draw: TextDraw<'_>) -> Result<()>;

    /// Write out the document with everything drawn so far
    fn serialize(&mut self) -> Result<Vec<u8>>;
}
