//! Layout data types
//!
//! Core data structures for stamp layout:
//! - Page geometry and visual/native points
//! - Layout elements (images and text lines)
//! - The stacked stamp block

use crate::types::{FontWeight, PageRotation};

/// Native page size and rotation.
///
/// `width` and `height` come from the page's MediaBox and are expressed in
/// the native (unrotated) coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub rotation: PageRotation,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, rotation: PageRotation) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// Width of the page as a viewer displays it
    pub fn visual_width(&self) -> f32 {
        if self.rotation.is_sideways() {
            self.height
        } else {
            self.width
        }
    }

    /// Height of the page as a viewer displays it
    pub fn visual_height(&self) -> f32 {
        if self.rotation.is_sideways() {
            self.width
        } else {
            self.height
        }
    }
}

/// A point in visual space: top-left origin, x right, y down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualPoint {
    pub x: f32,
    pub y: f32,
}

impl VisualPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Draw anchor in native page space (bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeAnchor {
    pub x: f32,
    pub y: f32,
    /// Counter-clockwise rotation to apply to the drawn primitive
    pub rotation_degrees: i32,
}

/// An image embedded in the target document.
///
/// `id` is assigned by the [`StampSurface`](crate::StampSurface) that embedded
/// it; `width`/`height` are the intrinsic pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    /// Size after scaling to `target_height`, preserving aspect ratio
    pub fn scaled_to_height(&self, target_height: f32) -> (f32, f32) {
        if self.height == 0 {
            return (0.0, 0.0);
        }
        let scale = target_height / self.height as f32;
        (self.width as f32 * scale, target_height)
    }
}

/// What an image element represents in the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Logo,
    Signature,
    QrCode,
}

/// A measured line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub weight: FontWeight,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,
}

/// One entry of the stamp block, in stacking order
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Image {
        role: ImageRole,
        image: ImageHandle,
        width: f32,
        height: f32,
    },
    Text(TextLine),
}

impl LayoutElement {
    pub fn width(&self) -> f32 {
        match self {
            LayoutElement::Image { width, .. } => *width,
            LayoutElement::Text(line) => line.width,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            LayoutElement::Image { height, .. } => *height,
            LayoutElement::Text(line) => line.height,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, LayoutElement::Text(_))
    }

    pub fn role(&self) -> Option<ImageRole> {
        match self {
            LayoutElement::Image { role, .. } => Some(*role),
            LayoutElement::Text(_) => None,
        }
    }
}

/// An element with its top-left offset inside the block (visual space)
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement {
    pub element: LayoutElement,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// The vertically stacked stamp block, shared by every stamped page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StampBlock {
    pub elements: Vec<PlacedElement>,
    pub width: f32,
    pub height: f32,
}

impl StampBlock {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
