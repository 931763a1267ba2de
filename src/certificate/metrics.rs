//! Advance widths for the overlay font.
//!
//! The overlay renderer draws the name in Helvetica-Bold, one of the base-14
//! fonts every PDF consumer ships, so no font program is embedded in the
//! output. Horizontal centering only needs the advance widths, which are
//! expressed here in font units (1000 per em) for the printable ASCII range.

/// Font units per em square.
pub const UNITS_PER_EM: f32 = 1000.0;

/// Advance width used for characters outside the table.
const DEFAULT_WIDTH: u16 = 556;

/// Helvetica-Bold advance widths for `' '..='~'` (0x20..=0x7E).
const WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278,
    278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584,
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611,
    833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333,
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278,
    556, 278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556,
    500, 389, 280, 389, 584,
];

/// Advance width of a single character in font units.
pub fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        WIDTHS[(code - 0x20) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` in points when set at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 * font_size / UNITS_PER_EM
}
