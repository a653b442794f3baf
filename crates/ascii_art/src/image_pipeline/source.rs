use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use crate::AsciiError;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity token of a [`SourceImage`].
///
/// Every constructed image receives a fresh token, so two images holding the
/// same pixels still compare unequal here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        Self(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Decoded RGB image handed to the pipeline.
///
/// The pixel buffer is immutable once wrapped. Every wrapped buffer gets a
/// fresh identity; wrap a cloned buffer with [`SourceImage::new`] to copy.
#[derive(Debug)]
pub struct SourceImage {
    id: ImageId,
    pixels: RgbImage,
}

impl SourceImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self { id: ImageId::next(), pixels }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AsciiError> {
        let image = image::open(path)?;
        Ok(Self::from(image))
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at (`row`, `col`), or `None` outside the image.
    pub fn pixel(&self, row: u32, col: u32) -> Option<[u8; 3]> {
        if row < self.height() && col < self.width() {
            Some(self.pixels.get_pixel(col, row).0)
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

impl From<RgbImage> for SourceImage {
    fn from(pixels: RgbImage) -> Self {
        Self::new(pixels)
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        log::debug!("converting {width}x{height} {:?} image to rgb8", image.color());
        Self::new(image.into_rgb8())
    }
}

/// Uniformly colored image, mostly useful for tests and previews.
pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_pixels_get_distinct_identities() {
        let a = SourceImage::new(solid(4, 4, [10, 20, 30]));
        let b = SourceImage::new(solid(4, 4, [10, 20, 30]));

        assert_eq!(a.pixels(), b.pixels());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn pixel_accessor_is_row_major() {
        let mut pixels = solid(3, 2, [0, 0, 0]);
        pixels.put_pixel(2, 1, Rgb([1, 2, 3]));
        let image = SourceImage::new(pixels);

        assert_eq!(image.pixel(1, 2), Some([1, 2, 3]));
        assert_eq!(image.pixel(2, 1), None);
        assert_eq!(image.pixel(0, 3), None);
    }

    #[test]
    fn dynamic_images_are_converted_to_rgb() {
        let gray = image::GrayImage::from_pixel(2, 2, image::Luma([200]));
        let image = SourceImage::from(DynamicImage::ImageLuma8(gray));

        assert_eq!(image.pixel(0, 0), Some([200, 200, 200]));
    }
}
