//! Width metrics for the standard Helvetica fonts
//!
//! Stamped text is drawn with the PDF base-14 Helvetica and Helvetica-Bold
//! fonts in WinAnsi encoding, so the widths below (from the Adobe AFM files,
//! in 1/1000 em) are exactly what a viewer uses to lay the text out.

use crate::types::FontWeight;

/// Width used for encoded bytes outside the printable ASCII table
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica widths for bytes 32..=126
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for bytes 32..=126
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// PostScript name of the base font for a weight
pub fn base_font_name(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Regular => "Helvetica",
        FontWeight::Bold => "Helvetica-Bold",
    }
}

/// Encode text as WinAnsi bytes. Characters with no WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

/// Width of one encoded byte, in 1/1000 em
fn glyph_width(byte: u8, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    match byte {
        32..=126 => table[usize::from(byte - 32)],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in points when drawn at `size`
pub fn text_width(text: &str, weight: FontWeight, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|b| u32::from(glyph_width(b, weight)))
        .sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // "Hi" = 722 + 222 in Helvetica
        assert!((text_width("Hi", FontWeight::Regular, 10.0) - 9.44).abs() < 1e-4);
        // "Hi" = 722 + 278 in Helvetica-Bold
        assert!((text_width("Hi", FontWeight::Bold, 10.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Example Company Sdn. Bhd.";
        assert!(text_width(text, FontWeight::Bold, 10.0) > text_width(text, FontWeight::Regular, 10.0));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(text_width("", FontWeight::Regular, 12.0), 0.0);
    }

    #[test]
    fn test_encoding() {
        assert_eq!(encode_win_ansi("A–é"), vec![b'A', 0x96, 0xe9]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }
}
