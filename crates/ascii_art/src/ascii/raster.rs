//! Glyph bitmaps used to measure how much ink a character puts on screen.

/// Edge length of a glyph mask.
pub const MASK_SIZE: usize = 16;

/// Number of cells in a glyph mask.
pub const MASK_AREA: usize = MASK_SIZE * MASK_SIZE;

/// 16x16 coverage grid of a rendered character, `true` marking ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    cells: [[bool; MASK_SIZE]; MASK_SIZE],
}

impl GlyphMask {
    pub fn blank() -> Self {
        Self { cells: [[false; MASK_SIZE]; MASK_SIZE] }
    }

    pub fn from_fn<F: FnMut(usize, usize) -> bool>(mut f: F) -> Self {
        let mut mask = Self::blank();
        for (row, cells) in mask.cells.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = f(row, col);
            }
        }
        mask
    }

    /// Mask whose first `count` cells, in reading order, are inked.
    pub fn with_coverage(count: usize) -> Self {
        Self::from_fn(|row, col| row * MASK_SIZE + col < count)
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Number of inked cells.
    pub fn coverage(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Fraction of inked cells.
    pub fn raw_brightness(&self) -> f64 {
        self.coverage() as f64 / MASK_AREA as f64
    }
}

/// Source of glyph masks. Implementations must be deterministic.
pub trait GlyphRasterizer {
    fn mask(&self, symbol: char) -> GlyphMask;
}

impl<F> GlyphRasterizer for F
where
    F: Fn(char) -> GlyphMask,
{
    fn mask(&self, symbol: char) -> GlyphMask {
        self(symbol)
    }
}

/// Built-in rasterizer drawing printable ASCII from an 8x8 bitmap font,
/// doubled on both axes.
///
/// Characters outside the printable range render as a boxed placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFont;

impl BitmapFont {
    fn pattern(symbol: char) -> [u8; 8] {
        let code = symbol as u32;
        if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&code) {
            FONT8X8_PRINTABLE[(code - FIRST_PRINTABLE) as usize]
        } else {
            PLACEHOLDER
        }
    }
}

impl GlyphRasterizer for BitmapFont {
    fn mask(&self, symbol: char) -> GlyphMask {
        let pattern = Self::pattern(symbol);
        GlyphMask::from_fn(|row, col| (pattern[row / 2] >> (7 - col / 2)) & 1 == 1)
    }
}

const FIRST_PRINTABLE: u32 = 0x20;
const LAST_PRINTABLE: u32 = 0x7E;

const PLACEHOLDER: [u8; 8] = [0x7E, 0x81, 0xA5, 0x81, 0xBD, 0x99, 0x81, 0x7E];

/// font8x8 by Daniel Hepper (public domain), U+0020 through U+007E.
/// Each row byte has its most significant bit on the left.
#[rustfmt::skip]
const FONT8X8_PRINTABLE: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // '!'
    [0x6C, 0x6C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '"'
    [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00], // '#'
    [0x30, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x30, 0x00], // '$'
    [0x00, 0xC6, 0xCC, 0x18, 0x30, 0x66, 0xC6, 0x00], // '%'
    [0x38, 0x6C, 0x38, 0x76, 0xDC, 0xCC, 0x76, 0x00], // '&'
    [0x60, 0x60, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00], // '''
    [0x18, 0x30, 0x60, 0x60, 0x60, 0x30, 0x18, 0x00], // '('
    [0x60, 0x30, 0x18, 0x18, 0x18, 0x30, 0x60, 0x00], // ')'
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // '*'
    [0x00, 0x30, 0x30, 0xFC, 0x30, 0x30, 0x00, 0x00], // '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x60], // ','
    [0x00, 0x00, 0x00, 0xFC, 0x00, 0x00, 0x00, 0x00], // '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x00], // '.'
    [0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80, 0x00], // '/'
    [0x7C, 0xC6, 0xCE, 0xDE, 0xF6, 0xE6, 0x7C, 0x00], // '0'
    [0x30, 0x70, 0x30, 0x30, 0x30, 0x30, 0xFC, 0x00], // '1'
    [0x78, 0xCC, 0x0C, 0x38, 0x60, 0xCC, 0xFC, 0x00], // '2'
    [0x78, 0xCC, 0x0C, 0x38, 0x0C, 0xCC, 0x78, 0x00], // '3'
    [0x1C, 0x3C, 0x6C, 0xCC, 0xFE, 0x0C, 0x1E, 0x00], // '4'
    [0xFC, 0xC0, 0xF8, 0x0C, 0x0C, 0xCC, 0x78, 0x00], // '5'
    [0x38, 0x60, 0xC0, 0xF8, 0xCC, 0xCC, 0x78, 0x00], // '6'
    [0xFC, 0xCC, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x00], // '7'
    [0x78, 0xCC, 0xCC, 0x78, 0xCC, 0xCC, 0x78, 0x00], // '8'
    [0x78, 0xCC, 0xCC, 0x7C, 0x0C, 0x18, 0x70, 0x00], // '9'
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x00], // ':'
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x60], // ';'
    [0x18, 0x30, 0x60, 0xC0, 0x60, 0x30, 0x18, 0x00], // '<'
    [0x00, 0x00, 0xFC, 0x00, 0x00, 0xFC, 0x00, 0x00], // '='
    [0x60, 0x30, 0x18, 0x0C, 0x18, 0x30, 0x60, 0x00], // '>'
    [0x78, 0xCC, 0x0C, 0x18, 0x30, 0x00, 0x30, 0x00], // '?'
    [0x7C, 0xC6, 0xDE, 0xDE, 0xDE, 0xC0, 0x78, 0x00], // '@'
    [0x30, 0x78, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0x00], // 'A'
    [0xFC, 0x66, 0x66, 0x7C, 0x66, 0x66, 0xFC, 0x00], // 'B'
    [0x3C, 0x66, 0xC0, 0xC0, 0xC0, 0x66, 0x3C, 0x00], // 'C'
    [0xF8, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0xF8, 0x00], // 'D'
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x62, 0xFE, 0x00], // 'E'
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x60, 0xF0, 0x00], // 'F'
    [0x3C, 0x66, 0xC0, 0xC0, 0xCE, 0x66, 0x3E, 0x00], // 'G'
    [0xCC, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0xCC, 0x00], // 'H'
    [0x78, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // 'I'
    [0x1E, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78, 0x00], // 'J'
    [0xE6, 0x66, 0x6C, 0x78, 0x6C, 0x66, 0xE6, 0x00], // 'K'
    [0xF0, 0x60, 0x60, 0x60, 0x62, 0x66, 0xFE, 0x00], // 'L'
    [0xC6, 0xEE, 0xFE, 0xFE, 0xD6, 0xC6, 0xC6, 0x00], // 'M'
    [0xC6, 0xE6, 0xF6, 0xDE, 0xCE, 0xC6, 0xC6, 0x00], // 'N'
    [0x38, 0x6C, 0xC6, 0xC6, 0xC6, 0x6C, 0x38, 0x00], // 'O'
    [0xFC, 0x66, 0x66, 0x7C, 0x60, 0x60, 0xF0, 0x00], // 'P'
    [0x78, 0xCC, 0xCC, 0xCC, 0xDC, 0x78, 0x1C, 0x00], // 'Q'
    [0xFC, 0x66, 0x66, 0x7C, 0x6C, 0x66, 0xE6, 0x00], // 'R'
    [0x78, 0xCC, 0xE0, 0x70, 0x1C, 0xCC, 0x78, 0x00], // 'S'
    [0xFC, 0xB4, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // 'T'
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xFC, 0x00], // 'U'
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // 'V'
    [0xC6, 0xC6, 0xC6, 0xD6, 0xFE, 0xEE, 0xC6, 0x00], // 'W'
    [0xC6, 0xC6, 0x6C, 0x38, 0x38, 0x6C, 0xC6, 0x00], // 'X'
    [0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x30, 0x78, 0x00], // 'Y'
    [0xFE, 0xC6, 0x8C, 0x18, 0x32, 0x66, 0xFE, 0x00], // 'Z'
    [0x78, 0x60, 0x60, 0x60, 0x60, 0x60, 0x78, 0x00], // '['
    [0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x02, 0x00], // '\'
    [0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0x78, 0x00], // ']'
    [0x10, 0x38, 0x6C, 0xC6, 0x00, 0x00, 0x00, 0x00], // '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // '_'
    [0x30, 0x30, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // '`'
    [0x00, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x76, 0x00], // 'a'
    [0xE0, 0x60, 0x60, 0x7C, 0x66, 0x66, 0xDC, 0x00], // 'b'
    [0x00, 0x00, 0x78, 0xCC, 0xC0, 0xCC, 0x78, 0x00], // 'c'
    [0x1C, 0x0C, 0x0C, 0x7C, 0xCC, 0xCC, 0x76, 0x00], // 'd'
    [0x00, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // 'e'
    [0x38, 0x6C, 0x60, 0xF0, 0x60, 0x60, 0xF0, 0x00], // 'f'
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // 'g'
    [0xE0, 0x60, 0x6C, 0x76, 0x66, 0x66, 0xE6, 0x00], // 'h'
    [0x30, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // 'i'
    [0x0C, 0x00, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78], // 'j'
    [0xE0, 0x60, 0x66, 0x6C, 0x78, 0x6C, 0xE6, 0x00], // 'k'
    [0x70, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // 'l'
    [0x00, 0x00, 0xCC, 0xFE, 0xFE, 0xD6, 0xC6, 0x00], // 'm'
    [0x00, 0x00, 0xF8, 0xCC, 0xCC, 0xCC, 0xCC, 0x00], // 'n'
    [0x00, 0x00, 0x78, 0xCC, 0xCC, 0xCC, 0x78, 0x00], // 'o'
    [0x00, 0x00, 0xDC, 0x66, 0x66, 0x7C, 0x60, 0xF0], // 'p'
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0x1E], // 'q'
    [0x00, 0x00, 0xDC, 0x76, 0x66, 0x60, 0xF0, 0x00], // 'r'
    [0x00, 0x00, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x00], // 's'
    [0x10, 0x30, 0x7C, 0x30, 0x30, 0x34, 0x18, 0x00], // 't'
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0xCC, 0x76, 0x00], // 'u'
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // 'v'
    [0x00, 0x00, 0xC6, 0xD6, 0xFE, 0xFE, 0x6C, 0x00], // 'w'
    [0x00, 0x00, 0xC6, 0x6C, 0x38, 0x6C, 0xC6, 0x00], // 'x'
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // 'y'
    [0x00, 0x00, 0xFC, 0x98, 0x30, 0x64, 0xFC, 0x00], // 'z'
    [0x1C, 0x30, 0x30, 0xE0, 0x30, 0x30, 0x1C, 0x00], // '{'
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // '|'
    [0xE0, 0x30, 0x30, 0x1C, 0x30, 0x30, 0xE0, 0x00], // '}'
    [0x76, 0xDC, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '~'
];
