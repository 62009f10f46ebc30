//! Vertical stacking of stamp elements
//!
//! The block is a single column. Every element is aligned horizontally
//! against the widest element, then stacked top to bottom:
//! - text lines advance by their own line height only
//! - images (logo, signature, QR) are followed by a fixed gap
//! - one extra gap separates the QR code from any text above it

use crate::types::Alignment;

use super::{ImageRole, LayoutElement, PlacedElement, StampBlock};

/// Running state of the stacking fold
struct Cursor {
    y: f32,
    seen_text: bool,
    placed: Vec<PlacedElement>,
}

/// Stack `elements` into a block.
///
/// `gap` is the spacing inserted after image elements
/// (normally [`ELEMENT_GAP`](crate::constants::ELEMENT_GAP)).
pub fn stack_elements(elements: Vec<LayoutElement>, alignment: Alignment, gap: f32) -> StampBlock {
    let width = elements
        .iter()
        .map(LayoutElement::width)
        .fold(0.0_f32, f32::max);

    let start = Cursor {
        y: 0.0,
        seen_text: false,
        placed: Vec::with_capacity(elements.len()),
    };

    let end = elements.into_iter().fold(start, |mut cursor, element| {
        if element.role() == Some(ImageRole::QrCode) && cursor.seen_text {
            cursor.y += gap;
        }

        let offset_x = alignment.offset(width, element.width());
        let offset_y = cursor.y;

        cursor.y += element.height();
        if element.is_text() {
            cursor.seen_text = true;
        } else {
            cursor.y += gap;
        }

        cursor.placed.push(PlacedElement {
            element,
            offset_x,
            offset_y,
        });
        cursor
    });

    StampBlock {
        elements: end.placed,
        width,
        height: end.y,
    }
}
