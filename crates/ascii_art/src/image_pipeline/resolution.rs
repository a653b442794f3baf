use crate::AsciiError;

/// Range of resolutions (characters per row) an image supports.
///
/// Bounds come from the original, unpadded dimensions: at most one character
/// per pixel column and at least enough columns that a square tile fits into
/// the image height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionBounds {
    pub min: u32,
    pub max: u32,
}

impl ResolutionBounds {
    pub fn for_image(width: u32, height: u32) -> Self {
        let min = if height == 0 { 1 } else { (width / height).max(1) };
        Self { min, max: width }
    }

    pub fn contains(&self, resolution: u32) -> bool {
        (self.min..=self.max).contains(&resolution)
    }

    pub fn check(&self, resolution: u32) -> Result<u32, AsciiError> {
        if self.contains(resolution) {
            Ok(resolution)
        } else {
            Err(AsciiError::InvalidResolution { resolution, min: self.min, max: self.max })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStep {
    Up,
    Down,
}

impl ResolutionStep {
    pub fn apply(self, resolution: u32) -> u32 {
        match self {
            ResolutionStep::Up => resolution.saturating_mul(2),
            ResolutionStep::Down => resolution / 2,
        }
    }

    /// Step `resolution` and validate the result against `bounds`.
    pub fn apply_within(
        self,
        resolution: u32,
        bounds: ResolutionBounds,
    ) -> Result<u32, AsciiError> {
        bounds.check(self.apply(resolution))
    }
}
