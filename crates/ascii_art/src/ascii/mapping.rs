use crate::image_pipeline::brightness::BrightnessMatrix;
use crate::AsciiError;

use super::grid::GlyphGrid;
use super::table::{BrightnessKey, GlyphIndex};

impl GlyphIndex {
    /// Character whose normalized brightness is nearest to `brightness`.
    ///
    /// Ties between the entries just below and just above resolve to the lower
    /// character code; within an entry the lowest code always wins.
    pub fn best_match(&self, brightness: f64) -> Result<char, AsciiError> {
        let key = BrightnessKey(brightness);
        let floor = self.entries.range(..=key).next_back();
        let ceiling = self.entries.range(key..).next();

        let chars = match (floor, ceiling) {
            (None, None) => return Err(AsciiError::EmptyCharacterSet),
            (Some((_, chars)), None) | (None, Some((_, chars))) => chars,
            (Some((low, chars)), Some(_)) if low.0 == brightness => chars,
            (Some((low, below)), Some((high, above))) => {
                let below_distance = (brightness - low.0).abs();
                let above_distance = (high.0 - brightness).abs();
                if below_distance < above_distance {
                    below
                } else if above_distance < below_distance {
                    above
                } else {
                    return Ok(lowest(below).min(lowest(above)));
                }
            },
        };

        Ok(lowest(chars))
    }
}

fn lowest(chars: &[char]) -> char {
    // Index entries are never empty.
    chars[0]
}

/// Turns brightness matrices into glyph grids against one index snapshot.
pub struct GlyphMapper<'a> {
    index: &'a GlyphIndex,
}

impl<'a> GlyphMapper<'a> {
    pub fn new(index: &'a GlyphIndex) -> Self {
        Self { index }
    }

    /// Match every cell, inverting brightness first when `invert` is set.
    pub fn map_brightness(
        &self,
        matrix: &BrightnessMatrix,
        invert: bool,
    ) -> Result<GlyphGrid, AsciiError> {
        let cells = matrix
            .values()
            .iter()
            .map(|&value| {
                let brightness = if invert { 1.0 - value } else { value };
                self.index.best_match(brightness)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GlyphGrid::new(matrix.columns(), matrix.rows(), cells))
    }
}
