/// Row-major grid of matched characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<char>,
}

impl GlyphGrid {
    pub fn new(width: u32, height: u32, cells: Vec<char>) -> Self {
        assert_eq!(width as usize * height as usize, cells.len());
        Self { width, height, cells }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<char> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get((row * self.width + col) as usize).copied()
    }

    pub fn row(&self, row: u32) -> Option<&[char]> {
        if row >= self.height {
            return None;
        }
        let start = (row * self.width) as usize;
        self.cells.get(start..start + self.width as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        // `chunks` rejects a zero size; a zero-width grid has no cells anyway.
        let width = (self.width as usize).max(1);
        self.cells.chunks(width).map(|row| row.iter().collect::<String>())
    }
}
