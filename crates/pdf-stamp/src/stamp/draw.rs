use crate::layout::{LayoutElement, baseline_anchor};
use crate::options::StampOptions;
use crate::preview::PageLayout;
use crate::surface::{ImageDraw, StampSurface, TextDraw};
use crate::types::*;

/// Issue the draw calls for one laid-out page
pub(super) fn draw_page(
    surface: &mut dyn StampSurface,
    layout: &PageLayout,
    options: &StampOptions,
) -> Result<()> {
    let rotation = layout.geometry.rotation;
    let color = options.text_color();

    for item in &layout.items {
        match &item.element {
            LayoutElement::Image {
                image,
                width,
                height,
                ..
            } => surface.draw_image(
                layout.page_index,
                image,
                ImageDraw {
                    anchor: item.anchor,
                    width: *width,
                    height: *height,
                    opacity: options.opacity,
                },
            )?,
            LayoutElement::Text(line) => surface.draw_text(
                layout.page_index,
                TextDraw {
                    text: &line.text,
                    weight: line.weight,
                    font_size: line.font_size,
                    anchor: baseline_anchor(
                        item.anchor,
                        line.height,
                        line.font_size,
                        options.calibration.baseline_factor,
                        rotation,
                    ),
                    color,
                    opacity: options.opacity,
                },
            )?,
        }
    }

    log::debug!(
        "Page {}: drew {} item(s) at rotation {}",
        layout.page_index + 1,
        layout.items.len(),
        rotation.degrees()
    );
    Ok(())
}
