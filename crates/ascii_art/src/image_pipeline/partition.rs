//! Power-of-two padding and square tiling of images.
use std::borrow::Cow;

use image::{imageops, GenericImageView, Rgb, RgbImage, SubImage};

use crate::AsciiError;

const PADDING: Rgb<u8> = Rgb([255, 255, 255]);

/// Pad `image` with white so both dimensions become powers of two.
///
/// The original is centered on each axis independently, with the offset
/// rounded down. Images that already have power-of-two dimensions are returned
/// as-is without copying.
pub fn pad(image: &RgbImage) -> Cow<'_, RgbImage> {
    let (width, height) = image.dimensions();
    let padded_width = width.next_power_of_two();
    let padded_height = height.next_power_of_two();

    if padded_width == width && padded_height == height {
        return Cow::Borrowed(image);
    }

    let (col_offset, row_offset) = pad_offset(width, height);
    log::debug!(
        "padding {width}x{height} image to {padded_width}x{padded_height} at offset \
         ({col_offset}, {row_offset})"
    );

    let mut canvas = RgbImage::from_pixel(padded_width, padded_height, PADDING);
    imageops::replace(&mut canvas, image, i64::from(col_offset), i64::from(row_offset));
    Cow::Owned(canvas)
}

/// Column and row offset at which [`pad`] places an image of this size.
pub fn pad_offset(width: u32, height: u32) -> (u32, u32) {
    ((width.next_power_of_two() - width) / 2, (height.next_power_of_two() - height) / 2)
}

/// Square views into a padded image, stored row-major.
pub struct TileGrid<'a> {
    rows: u32,
    columns: u32,
    tile_size: u32,
    tiles: Vec<SubImage<&'a RgbImage>>,
}

impl<'a> TileGrid<'a> {
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Edge length in pixels of every tile.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&SubImage<&'a RgbImage>> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.tiles.get((row * self.columns + col) as usize)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &SubImage<&'a RgbImage>> {
        self.tiles.iter()
    }
}

/// Split a padded image into `resolution` columns of square tiles.
///
/// Tile edge is `width / resolution`; the grid gets `height / tile` rows.
/// Resolutions that do not divide the width, or whose tiles would be taller
/// than the image, are rejected rather than producing a partial grid.
pub fn split(image: &RgbImage, resolution: u32) -> Result<TileGrid<'_>, AsciiError> {
    let (width, height) = image.dimensions();
    let invalid = || AsciiError::UntileableResolution { resolution, width, height };

    if resolution == 0 || width % resolution != 0 {
        return Err(invalid());
    }

    let tile_size = width / resolution;
    let rows = height / tile_size;
    if rows == 0 {
        return Err(invalid());
    }

    let mut tiles = Vec::with_capacity((rows * resolution) as usize);
    for row in 0..rows {
        for col in 0..resolution {
            tiles.push(image.view(col * tile_size, row * tile_size, tile_size, tile_size));
        }
    }

    log::debug!("split {width}x{height} image into {rows}x{resolution} tiles of {tile_size}px");
    Ok(TileGrid { rows, columns: resolution, tile_size, tiles })
}
