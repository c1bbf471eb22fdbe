// --- File: font.rs ---
// Tiny 5x8 bitmap font used for the message and overlay text.
// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
// Rows 0-6 hold capitals and x-height letters, row 7 is the descender.

pub const GLYPH_COLUMNS: usize = 5;
pub const GLYPH_ROWS: usize = 8;
// Horizontal advance in font pixels (glyph + 1 pixel spacing).
pub const GLYPH_ADVANCE: usize = 6;

pub type Glyph = [u8; GLYPH_ROWS];

macro_rules! g {
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr) => {
        Some([$a, $b, $c, $d, $e, $f, $g, 0])
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr, $h:expr) => {
        Some([$a, $b, $c, $d, $e, $f, $g, $h])
    };
}

/// Bitmap for `ch`, or None for characters the font does not cover.
pub fn glyph(ch: char) -> Option<Glyph> {
    match ch {
        ' ' => g!(0, 0, 0, 0, 0, 0, 0),

        // Digits 0..9
        '0' => g!(0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110),
        '1' => g!(0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        '2' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111),
        '3' => g!(0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110),
        '4' => g!(0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010),
        '5' => g!(0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110),
        '6' => g!(0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110),
        '7' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000),
        '8' => g!(0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110),
        '9' => g!(0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100),

        // Capitals
        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'B' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110),
        'C' => g!(0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'F' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'J' => g!(0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'K' => g!(0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'M' => g!(0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001),
        'N' => g!(0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'P' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000),
        'Q' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'T' => g!(0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        'U' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        'X' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001),
        'Y' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100),
        'Z' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111),

        // Lowercase
        'a' => g!(0, 0, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111),
        'b' => g!(0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110),
        'c' => g!(0, 0, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110),
        'd' => g!(0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111),
        'e' => g!(0, 0, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110),
        'f' => g!(0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000),
        'g' => g!(0, 0, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110),
        'h' => g!(0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001),
        'i' => g!(0b00100, 0, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110),
        'j' => g!(0b00010, 0, 0b00110, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'k' => g!(0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010),
        'l' => g!(0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'm' => g!(0, 0, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001),
        'n' => g!(0, 0, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001),
        'o' => g!(0, 0, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110),
        'p' => g!(0, 0, 0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000),
        'q' => g!(0, 0, 0b01101, 0b10011, 0b10001, 0b01111, 0b00001, 0b00001),
        'r' => g!(0, 0, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000),
        's' => g!(0, 0, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110),
        't' => g!(0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110),
        'u' => g!(0, 0, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101),
        'v' => g!(0, 0, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'w' => g!(0, 0, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010),
        'x' => g!(0, 0, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001),
        'y' => g!(0, 0, 0b10001, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110),
        'z' => g!(0, 0, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111),

        // Spanish accents: acute over the x-height body
        'á' => g!(0b00010, 0b00100, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111),
        'é' => g!(0b00010, 0b00100, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110),
        'í' => g!(0b00010, 0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110),
        'ó' => g!(0b00010, 0b00100, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110),
        'ú' => g!(0b00010, 0b00100, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101),
        'ñ' => g!(0b01101, 0b10110, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001),

        // Punctuation
        '!' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100),
        '¡' => g!(0b00100, 0, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        '?' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100),
        '¿' => g!(0b00100, 0, 0b00100, 0b01000, 0b10000, 0b10001, 0b01110),
        '.' => g!(0, 0, 0, 0, 0, 0b01100, 0b01100),
        ',' => g!(0, 0, 0, 0, 0, 0b01100, 0b00100, 0b01000),
        ':' => g!(0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0),
        ';' => g!(0, 0b01100, 0b01100, 0, 0b01100, 0b00100, 0b01000),
        '\'' => g!(0b00100, 0b00100, 0b01000, 0, 0, 0, 0),
        '"' => g!(0b01010, 0b01010, 0, 0, 0, 0, 0),
        '-' => g!(0, 0, 0, 0b11111, 0, 0, 0),
        '(' => g!(0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010),
        ')' => g!(0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000),
        '<' => g!(0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010),
        '>' => g!(0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000),

        _ => None,
    }
}

/// Width of `line` in font pixels (no trailing spacing).
pub fn line_width(line: &str) -> usize {
    let count = line.chars().count();
    if count == 0 {
        0
    } else {
        count * GLYPH_ADVANCE - (GLYPH_ADVANCE - GLYPH_COLUMNS)
    }
}

/// Iterates the lit pixels of `glyph` as (column, row).
pub fn lit_pixels(glyph: Glyph) -> impl Iterator<Item = (usize, usize)> {
    (0..GLYPH_ROWS).flat_map(move |row| {
        (0..GLYPH_COLUMNS)
            .filter(move |column| glyph[row] & (1 << (GLYPH_COLUMNS - 1 - column)) != 0)
            .map(move |column| (column, row))
    })
}

// --- End of File: font.rs ---
