use crate::image_pipeline::brightness::BrightnessMatrix;
use crate::image_pipeline::source::ImageId;

/// What a cached brightness matrix was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheKey {
    pub image: ImageId,
    pub resolution: u32,
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    matrix: BrightnessMatrix,
}

/// Single-slot cache of the last computed brightness matrix.
///
/// A lookup for a different key evicts the stored entry, so at most one
/// matrix is kept alive at any time.
#[derive(Debug, Default)]
pub struct BrightnessCache {
    slot: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl BrightnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the matrix for `key`, computing and storing it on a miss.
    ///
    /// The previous entry is dropped before `compute` runs; if it fails the
    /// cache is left empty.
    pub fn get_or_try_insert_with<F, E>(
        &mut self,
        key: CacheKey,
        compute: F,
    ) -> Result<&BrightnessMatrix, E>
    where
        F: FnOnce() -> Result<BrightnessMatrix, E>,
    {
        let entry = match self.slot.take().filter(|entry| entry.key == key) {
            Some(entry) => {
                self.hits += 1;
                log::debug!("brightness cache hit for {key:?}");
                entry
            },
            None => {
                self.misses += 1;
                log::debug!("brightness cache miss for {key:?}");
                CacheEntry { key, matrix: compute()? }
            },
        };

        Ok(&self.slot.insert(entry).matrix)
    }

    /// Key of the stored matrix, if any.
    pub fn key(&self) -> Option<CacheKey> {
        self.slot.as_ref().map(|entry| entry.key)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
