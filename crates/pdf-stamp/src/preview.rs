//! Per-page placement of the stamp, in both coordinate spaces
//!
//! The same [`PageLayout`] feeds the PDF draw calls and any on-screen
//! preview, so what is previewed is exactly what gets stamped.

use crate::layout::*;
use crate::types::{Placement, RelativePosition};

/// One element positioned on one page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub element: LayoutElement,
    /// Visual top-left corner of the element
    pub visual: VisualPoint,
    /// Native anchor of the element's box (for text: the bottom of the line
    /// box, before baseline correction)
    pub anchor: NativeAnchor,
    /// Positioned on its own rather than as part of the block
    pub detached: bool,
}

impl PlacedItem {
    /// `(x, y, width, height)` in visual space
    pub fn visual_rect(&self) -> (f32, f32, f32, f32) {
        (
            self.visual.x,
            self.visual.y,
            self.element.width(),
            self.element.height(),
        )
    }
}

/// Everything stamped on one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_index: usize,
    pub geometry: PageGeometry,
    /// Visual top-left corner of the block
    pub block_origin: VisualPoint,
    pub block_width: f32,
    pub block_height: f32,
    pub items: Vec<PlacedItem>,
}

/// Position `block` (and a detached signature, if any) on a page
pub fn layout_page(
    page_index: usize,
    geometry: PageGeometry,
    block: &StampBlock,
    detached_signature: Option<&LayoutElement>,
    placement: &Placement,
    signature_position: &RelativePosition,
) -> PageLayout {
    let block_origin = block_anchor(placement, block, &geometry);

    let mut items: Vec<PlacedItem> = block
        .elements
        .iter()
        .map(|placed| {
            let visual = block_origin.offset(placed.offset_x, placed.offset_y);
            place(&placed.element, visual, &geometry, false)
        })
        .collect();

    if let Some(signature) = detached_signature {
        let visual = relative_to_visual(signature_position, &geometry);
        items.push(place(signature, visual, &geometry, true));
    }

    PageLayout {
        page_index,
        geometry,
        block_origin,
        block_width: block.width,
        block_height: block.height,
        items,
    }
}

fn place(
    element: &LayoutElement,
    visual: VisualPoint,
    geometry: &PageGeometry,
    detached: bool,
) -> PlacedItem {
    PlacedItem {
        element: element.clone(),
        visual,
        anchor: map_visual_to_native(visual, element.width(), element.height(), geometry),
        detached,
    }
}
