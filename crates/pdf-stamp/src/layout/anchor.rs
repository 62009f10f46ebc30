//! Block anchoring on a page
//!
//! Resolves where the top-left corner of the stamp block goes, in visual
//! space, for a page of a given geometry.

use crate::types::{Placement, RelativePosition};

use super::{PageGeometry, StampBlock, VisualPoint};

/// Visual top-left corner of a `block_width` x `block_height` block
pub fn resolve_anchor(
    placement: &Placement,
    block_width: f32,
    block_height: f32,
    page: &PageGeometry,
) -> VisualPoint {
    let visual_width = page.visual_width();
    let visual_height = page.visual_height();

    match placement {
        Placement::Custom(position) => relative_to_visual(position, page),
        Placement::Preset { corner, margin } => {
            let x = if corner.is_left() {
                *margin
            } else {
                visual_width - margin - block_width
            };
            let y = if corner.is_top() {
                *margin
            } else {
                visual_height - margin - block_height
            };
            VisualPoint::new(x, y)
        }
    }
}

/// Visual top-left corner of `block` on `page`
pub fn block_anchor(placement: &Placement, block: &StampBlock, page: &PageGeometry) -> VisualPoint {
    resolve_anchor(placement, block.width, block.height, page)
}

/// Scale a relative position by the visual page size
pub fn relative_to_visual(position: &RelativePosition, page: &PageGeometry) -> VisualPoint {
    VisualPoint::new(
        position.x * page.visual_width(),
        position.y * page.visual_height(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Corner, PageRotation};

    fn letter(rotation: PageRotation) -> PageGeometry {
        PageGeometry::new(612.0, 792.0, rotation)
    }

    fn preset(corner: Corner) -> Placement {
        Placement::Preset {
            corner,
            margin: 36.0,
        }
    }

    #[test]
    fn test_bottom_left_preset() {
        let page = letter(PageRotation::None);
        let anchor = resolve_anchor(&preset(Corner::BottomLeft), 120.0, 80.0, &page);
        assert_eq!(anchor, VisualPoint::new(36.0, 676.0));
    }

    #[test]
    fn test_other_presets() {
        let page = letter(PageRotation::None);
        assert_eq!(
            resolve_anchor(&preset(Corner::TopLeft), 120.0, 80.0, &page),
            VisualPoint::new(36.0, 36.0)
        );
        assert_eq!(
            resolve_anchor(&preset(Corner::TopRight), 120.0, 80.0, &page),
            VisualPoint::new(456.0, 36.0)
        );
        assert_eq!(
            resolve_anchor(&preset(Corner::BottomRight), 120.0, 80.0, &page),
            VisualPoint::new(456.0, 676.0)
        );
    }

    #[test]
    fn test_presets_use_visual_dimensions() {
        let page = letter(PageRotation::Clockwise90);
        let anchor = resolve_anchor(&preset(Corner::BottomRight), 120.0, 80.0, &page);
        assert_eq!(anchor, VisualPoint::new(792.0 - 36.0 - 120.0, 612.0 - 36.0 - 80.0));
    }

    #[test]
    fn test_custom_uses_visual_fractions() {
        let placement = Placement::Custom(RelativePosition::new(0.5, 0.25));
        let page = letter(PageRotation::Clockwise270);
        let anchor = resolve_anchor(&placement, 120.0, 80.0, &page);
        assert_eq!(anchor, VisualPoint::new(396.0, 153.0));
    }
}
