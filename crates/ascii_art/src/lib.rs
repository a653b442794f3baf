//! Brightness-matched ASCII art.
//!
//! An image is padded to power-of-two dimensions, cut into square tiles and
//! reduced to one brightness per tile. Each brightness is then matched to the
//! character of the active set whose ink coverage is closest after
//! normalization.
mod ascii;
mod image_pipeline;

pub use ascii::{
    cache::{BrightnessCache, CacheKey},
    grid::GlyphGrid,
    mapping::GlyphMapper,
    raster::{BitmapFont, GlyphMask, GlyphRasterizer, MASK_AREA, MASK_SIZE},
    table::{GlyphBrightnessTable, GlyphIndex, PRINTABLE_CHARS},
};
pub use image_pipeline::{
    brightness::{luminance, sample_grid, BrightnessMatrix, LuminanceSampler, TileSampler},
    partition::{pad, pad_offset, split, TileGrid},
    resolution::{ResolutionBounds, ResolutionStep},
    source::{solid, ImageId, SourceImage},
};

#[derive(Debug, thiserror::Error)]
pub enum AsciiError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Character set is empty.")]
    EmptyCharacterSet,
    #[error("resolution {resolution} is invalid, expected a value in {min}..={max}")]
    InvalidResolution { resolution: u32, min: u32, max: u32 },
    #[error("resolution {resolution} does not tile the padded {width}x{height} image")]
    UntileableResolution { resolution: u32, width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiOptions {
    /// Characters per output row.
    pub resolution: u32,
    /// Match `1 - brightness` instead of the sampled brightness.
    pub invert: bool,
}

impl Default for AsciiOptions {
    fn default() -> Self {
        Self { resolution: 2, invert: false }
    }
}

/// Drives the pad, split, sample and match pipeline.
///
/// The assembler owns a [`BrightnessCache`], so rendering the same image at
/// the same resolution again only repeats the matching step.
#[derive(Debug, Default)]
pub struct ArtAssembler<S = LuminanceSampler> {
    sampler: S,
    cache: BrightnessCache,
}

impl ArtAssembler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: TileSampler> ArtAssembler<S> {
    pub fn with_sampler(sampler: S) -> Self {
        Self { sampler, cache: BrightnessCache::new() }
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn cache(&self) -> &BrightnessCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Brightness per tile of `image` at `resolution`, reusing the cached
    /// matrix when both match the previous call.
    pub fn brightness_matrix(
        &mut self,
        image: &SourceImage,
        resolution: u32,
    ) -> Result<&BrightnessMatrix, AsciiError> {
        let key = CacheKey { image: image.id(), resolution };
        let sampler = &self.sampler;
        self.cache.get_or_try_insert_with(key, || {
            let padded = pad(image.pixels());
            let tiles = split(&padded, resolution)?;
            Ok(sample_grid(&tiles, sampler))
        })
    }

    /// Convert `image` into a character grid with `resolution` columns.
    pub fn run(
        &mut self,
        image: &SourceImage,
        resolution: u32,
        index: &GlyphIndex,
        invert: bool,
    ) -> Result<GlyphGrid, AsciiError> {
        let matrix = self.brightness_matrix(image, resolution)?;
        GlyphMapper::new(index).map_brightness(matrix, invert)
    }

    pub fn render<R: GlyphRasterizer>(
        &mut self,
        image: &SourceImage,
        table: &GlyphBrightnessTable<R>,
        options: &AsciiOptions,
    ) -> Result<GlyphGrid, AsciiError> {
        self.run(image, options.resolution, table.index(), options.invert)
    }
}
