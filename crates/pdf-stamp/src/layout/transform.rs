//! Visual to native coordinate mapping
//!
//! Layout happens in visual space: the page as a viewer shows it, origin at
//! the top-left, y growing downwards. PDF drawing happens in native space:
//! origin at the bottom-left of the MediaBox, y growing upwards, before the
//! page's `/Rotate` is applied by the viewer.
//!
//! A primitive drawn with the page's rotation (counter-clockwise, in native
//! space) and anchored at its own bottom-left corner appears upright to the
//! viewer. The mapping below picks that anchor for each rotation.

use crate::types::PageRotation;

use super::{NativeAnchor, PageGeometry, VisualPoint};

/// Map the visual top-left corner of a `width` x `height` item to its native
/// draw anchor.
///
/// The anchor is the item's visual bottom-left corner, so only its height
/// moves the anchor; the width runs along the rotated x axis.
pub fn map_visual_to_native(
    point: VisualPoint,
    _width: f32,
    height: f32,
    page: &PageGeometry,
) -> NativeAnchor {
    let (w, h) = (page.width, page.height);
    let (x, y) = match page.rotation {
        PageRotation::None => (point.x, h - point.y - height),
        PageRotation::Clockwise90 => (point.y + height, point.x),
        PageRotation::Clockwise180 => (w - point.x, point.y + height),
        PageRotation::Clockwise270 => (w - (point.y + height), h - point.x),
    };
    NativeAnchor {
        x,
        y,
        rotation_degrees: page.rotation.degrees(),
    }
}

/// Inverse of [`map_visual_to_native`]: recover the visual top-left corner of
/// an item of the given `height` drawn at `anchor`.
pub fn map_native_to_visual(anchor: &NativeAnchor, height: f32, page: &PageGeometry) -> VisualPoint {
    let (w, h) = (page.width, page.height);
    let (x, y) = match page.rotation {
        PageRotation::None => (anchor.x, h - anchor.y - height),
        PageRotation::Clockwise90 => (anchor.y, anchor.x - height),
        PageRotation::Clockwise180 => (w - anchor.x, anchor.y - height),
        PageRotation::Clockwise270 => (h - anchor.y, w - anchor.x - height),
    };
    VisualPoint::new(x, y)
}

/// Move a line box anchor up to the text baseline.
///
/// The shift is `(line_height - font_size) * factor`, applied along the
/// direction that points visually up on the rotated page.
pub fn baseline_anchor(
    anchor: NativeAnchor,
    line_height: f32,
    font_size: f32,
    factor: f32,
    rotation: PageRotation,
) -> NativeAnchor {
    let shift = (line_height - font_size) * factor;
    let (dx, dy) = match rotation {
        PageRotation::None => (0.0, shift),
        PageRotation::Clockwise90 => (-shift, 0.0),
        PageRotation::Clockwise180 => (0.0, -shift),
        PageRotation::Clockwise270 => (shift, 0.0),
    };
    NativeAnchor {
        x: anchor.x + dx,
        y: anchor.y + dy,
        ..anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTATIONS: [PageRotation; 4] = [
        PageRotation::None,
        PageRotation::Clockwise90,
        PageRotation::Clockwise180,
        PageRotation::Clockwise270,
    ];

    fn letter(rotation: PageRotation) -> PageGeometry {
        PageGeometry::new(612.0, 792.0, rotation)
    }

    #[test]
    fn test_unrotated_mapping() {
        let page = letter(PageRotation::None);
        let anchor = map_visual_to_native(VisualPoint::new(36.0, 676.0), 120.0, 80.0, &page);
        assert_eq!(anchor.x, 36.0);
        assert_eq!(anchor.y, 36.0);
        assert_eq!(anchor.rotation_degrees, 0);
    }

    #[test]
    fn test_each_rotation_formula() {
        let p = VisualPoint::new(10.0, 20.0);
        let (w, h) = (612.0, 792.0);

        let a = map_visual_to_native(p, 50.0, 30.0, &letter(PageRotation::Clockwise90));
        assert_eq!((a.x, a.y, a.rotation_degrees), (50.0, 10.0, 90));

        let a = map_visual_to_native(p, 50.0, 30.0, &letter(PageRotation::Clockwise180));
        assert_eq!((a.x, a.y, a.rotation_degrees), (w - 10.0, 50.0, 180));

        let a = map_visual_to_native(p, 50.0, 30.0, &letter(PageRotation::Clockwise270));
        assert_eq!((a.x, a.y, a.rotation_degrees), (w - 50.0, h - 10.0, 270));
    }

    #[test]
    fn test_round_trip_all_rotations() {
        let points = [
            VisualPoint::new(0.0, 0.0),
            VisualPoint::new(36.0, 676.0),
            VisualPoint::new(123.25, 45.5),
        ];
        for rotation in ROTATIONS {
            let page = letter(rotation);
            for point in points {
                for (iw, ih) in [(10.0, 12.0), (120.0, 80.0), (60.0, 60.0)] {
                    let anchor = map_visual_to_native(point, iw, ih, &page);
                    let back = map_native_to_visual(&anchor, ih, &page);
                    assert!(
                        (back.x - point.x).abs() < 1e-3 && (back.y - point.y).abs() < 1e-3,
                        "{rotation:?}: {point:?} -> {anchor:?} -> {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_visual_corners_land_on_native_corners() {
        // An item in the visual top-left corner touches the native corner
        // that the viewer shows at the top-left.
        let page = letter(PageRotation::Clockwise90);
        let anchor = map_visual_to_native(VisualPoint::new(0.0, 0.0), 40.0, 10.0, &page);
        assert_eq!((anchor.x, anchor.y), (10.0, 0.0));

        let page = letter(PageRotation::Clockwise270);
        let anchor = map_visual_to_native(VisualPoint::new(0.0, 0.0), 40.0, 10.0, &page);
        assert_eq!((anchor.x, anchor.y), (602.0, 792.0));
    }

    #[test]
    fn test_baseline_shift_points_visually_up() {
        let base = NativeAnchor {
            x: 100.0,
            y: 100.0,
            rotation_degrees: 0,
        };
        // (12 - 10) * 0.3 = 0.6
        let shifted = |rotation| baseline_anchor(base, 12.0, 10.0, 0.3, rotation);
        let a = shifted(PageRotation::None);
        assert!((a.y - 100.6).abs() < 1e-4 && a.x == 100.0);
        let a = shifted(PageRotation::Clockwise90);
        assert!((a.x - 99.4).abs() < 1e-4 && a.y == 100.0);
        let a = shifted(PageRotation::Clockwise180);
        assert!((a.y - 99.4).abs() < 1e-4 && a.x == 100.0);
        let a = shifted(PageRotation::Clockwise270);
        assert!((a.x - 100.6).abs() < 1e-4 && a.y == 100.0);
    }

    #[test]
    fn test_visual_dimensions_swap_when_sideways() {
        let page = letter(PageRotation::Clockwise270);
        assert_eq!(page.visual_width(), 792.0);
        assert_eq!(page.visual_height(), 612.0);
        let page = letter(PageRotation::Clockwise180);
        assert_eq!(page.visual_width(), 612.0);
    }
}
