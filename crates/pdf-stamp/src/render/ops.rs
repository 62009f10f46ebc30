//! Content stream operators for stamp primitives
//!
//! Every primitive is wrapped in its own `q ... Q` pair so graphics state
//! (opacity, color, transformation) never leaks into the next one.

use crate::layout::NativeAnchor;
use crate::types::Rgb;

/// Cosine and sine of a counter-clockwise rotation.
/// Right angles are exact so the stream carries no `-0.0000000437`-style noise.
fn rotation_matrix(degrees: i32) -> (f32, f32) {
    match degrees.rem_euclid(360) {
        0 => (1.0, 0.0),
        90 => (0.0, 1.0),
        180 => (-1.0, 0.0),
        270 => (0.0, -1.0),
        other => {
            let radians = (other as f32).to_radians();
            (radians.cos(), radians.sin())
        }
    }
}

/// Place an image XObject: unit square scaled to `width` x `height`,
/// rotated about `anchor` and translated to it.
pub fn image_ops(
    xobject: &str,
    graphics_state: &str,
    anchor: &NativeAnchor,
    origin: (f32, f32),
    width: f32,
    height: f32,
) -> Vec<u8> {
    let (cos, sin) = rotation_matrix(anchor.rotation_degrees);
    format!(
        "q /{} gs {} {} {} {} {} {} cm /{} Do Q\n",
        graphics_state,
        width * cos,
        width * sin,
        -height * sin,
        height * cos,
        anchor.x + origin.0,
        anchor.y + origin.1,
        xobject
    )
    .into_bytes()
}

/// Show an already encoded string starting at the baseline `anchor`
pub fn text_ops(
    font: &str,
    graphics_state: &str,
    encoded_text: &[u8],
    font_size: f32,
    anchor: &NativeAnchor,
    origin: (f32, f32),
    color: Rgb,
) -> Vec<u8> {
    let (cos, sin) = rotation_matrix(anchor.rotation_degrees);
    let mut ops = format!(
        "q /{} gs {} {} {} rg BT /{} {} Tf {} {} {} {} {} {} Tm ",
        graphics_state,
        color.r,
        color.g,
        color.b,
        font,
        font_size,
        cos,
        sin,
        -sin,
        cos,
        anchor.x + origin.0,
        anchor.y + origin.1,
    )
    .into_bytes();
    ops.extend(literal_string(encoded_text));
    ops.extend_from_slice(b" Tj ET Q\n");
    ops
}

/// Encode bytes as a PDF literal string, escaping delimiters
pub fn literal_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out.push(b')');
    out
}
