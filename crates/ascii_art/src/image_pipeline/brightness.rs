use image::{GenericImageView, Rgb};

use super::partition::TileGrid;

const RED_WEIGHT: f64 = 0.2126;
const GREEN_WEIGHT: f64 = 0.7152;
const BLUE_WEIGHT: f64 = 0.0722;
const MAX_CHANNEL: f64 = 255.0;

/// Reduces one tile to a brightness in `[0, 1]`.
pub trait TileSampler {
    fn sample<I>(&self, tile: &I) -> f64
    where
        I: GenericImageView<Pixel = Rgb<u8>>;
}

/// Mean perceptual luminance, with no gamma correction.
#[derive(Clone, Copy, Debug, Default)]
pub struct LuminanceSampler;

impl TileSampler for LuminanceSampler {
    fn sample<I>(&self, tile: &I) -> f64
    where
        I: GenericImageView<Pixel = Rgb<u8>>,
    {
        let (width, height) = tile.dimensions();
        let total: f64 = tile.pixels().map(|(_, _, pixel)| luminance(pixel)).sum();
        total / (f64::from(width) * f64::from(height) * MAX_CHANNEL)
    }
}

/// Luminance of one pixel in `[0, 255]`.
pub fn luminance(Rgb([r, g, b]): Rgb<u8>) -> f64 {
    RED_WEIGHT * f64::from(r) + GREEN_WEIGHT * f64::from(g) + BLUE_WEIGHT * f64::from(b)
}

/// Row-major brightness per tile.
#[derive(Clone, Debug, PartialEq)]
pub struct BrightnessMatrix {
    rows: u32,
    columns: u32,
    values: Vec<f64>,
}

impl BrightnessMatrix {
    pub fn new(rows: u32, columns: u32, values: Vec<f64>) -> Self {
        assert_eq!(rows as usize * columns as usize, values.len());
        Self { rows, columns, values }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn get(&self, row: u32, col: u32) -> Option<f64> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.values.get((row * self.columns + col) as usize).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Sample every tile of `grid`.
pub fn sample_grid<S: TileSampler>(grid: &TileGrid<'_>, sampler: &S) -> BrightnessMatrix {
    // `SubImage` only derefs to its view; the view implements `GenericImageView`.
    let values = grid.tiles().map(|tile| sampler.sample(&**tile)).collect();
    BrightnessMatrix::new(grid.rows(), grid.columns(), values)
}

#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;
    use crate::image_pipeline::partition::split;
    use crate::image_pipeline::source::solid;

    #[test]
    fn white_and_black_are_the_extremes() {
        let sampler = LuminanceSampler;
        assert!((sampler.sample(&solid(4, 4, [255, 255, 255])) - 1.0).abs() < 1e-12);
        assert_eq!(sampler.sample(&solid(4, 4, [0, 0, 0])), 0.0);
    }

    #[test]
    fn channels_are_weighted_by_luminance() {
        let sampler = LuminanceSampler;
        let red = sampler.sample(&solid(2, 2, [255, 0, 0]));
        let green = sampler.sample(&solid(2, 2, [0, 255, 0]));
        let blue = sampler.sample(&solid(2, 2, [0, 0, 255]));

        assert!((red - RED_WEIGHT).abs() < 1e-12);
        assert!((green - GREEN_WEIGHT).abs() < 1e-12);
        assert!((blue - BLUE_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn matrix_follows_tile_layout() {
        let mut image = solid(4, 2, [255, 255, 255]);
        for y in 0..2 {
            image.put_pixel(2, y, Rgb([0, 0, 0]));
            image.put_pixel(3, y, Rgb([0, 0, 0]));
        }
        let grid = split(&image, 2).unwrap();
        let matrix = sample_grid(&grid, &LuminanceSampler);

        assert_eq!((matrix.rows(), matrix.columns()), (1, 2));
        assert!((matrix.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get(0, 1), Some(0.0));
        assert_eq!(matrix.get(1, 0), None);
    }

    #[test]
    fn samples_borrowed_views_like_owned_images() {
        let image = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 60) as u8, (y * 60) as u8, 7]));
        let view = image.view(0, 0, 4, 4);
        assert_eq!(LuminanceSampler.sample(&*view), LuminanceSampler.sample(&image));
    }
}
