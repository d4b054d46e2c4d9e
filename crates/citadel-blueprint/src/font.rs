//! 3x5 bitmap digits for dimension labels.

/// Glyph width in cells.
pub(crate) const GLYPH_WIDTH: i32 = 3;
/// Glyph height in cells.
pub(crate) const GLYPH_HEIGHT: i32 = 5;

/// Rows top to bottom; bit 2 is the leftmost column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Bitmap for `c`, or `None` for glyphs the font does not cover.
pub(crate) fn glyph(c: char) -> Option<&'static [u8; 5]> {
    let digit = c.to_digit(10)?;
    DIGITS.get(digit as usize)
}

/// Returns `true` if cell `(col, row)` of `glyph` is lit.
pub(crate) fn lit(glyph: &[u8; 5], col: i32, row: i32) -> bool {
    (0..GLYPH_WIDTH).contains(&col)
        && (0..GLYPH_HEIGHT).contains(&row)
        && glyph[row as usize] & (1 << (GLYPH_WIDTH - 1 - col)) != 0
}
