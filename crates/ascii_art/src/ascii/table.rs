use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use super::raster::{BitmapFont, GlyphRasterizer};

/// Printable ASCII, codes 32 through 126.
pub const PRINTABLE_CHARS: RangeInclusive<char> = ' '..='~';

/// Brightness value usable as an ordered map key.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BrightnessKey(pub(crate) f64);

impl PartialEq for BrightnessKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BrightnessKey {}

impl PartialOrd for BrightnessKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BrightnessKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Normalized brightness to the characters sharing it, in ascending code
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphIndex {
    pub(crate) entries: BTreeMap<BrightnessKey, Vec<char>>,
}

impl GlyphIndex {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct brightness keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending brightness order.
    pub fn entries(&self) -> impl Iterator<Item = (f64, &[char])> {
        self.entries.iter().map(|(key, chars)| (key.0, chars.as_slice()))
    }

    /// Key under which `symbol` is filed.
    pub fn brightness_of(&self, symbol: char) -> Option<f64> {
        self.entries
            .iter()
            .find(|(_, chars)| chars.binary_search(&symbol).is_ok())
            .map(|(key, _)| key.0)
    }
}

/// Active character set together with its brightness index.
///
/// Every membership change rebuilds the whole index, since adding or removing
/// a single character can move the normalization bounds.
#[derive(Clone, Debug)]
pub struct GlyphBrightnessTable<R = BitmapFont> {
    rasterizer: R,
    chars: BTreeSet<char>,
    index: GlyphIndex,
}

impl GlyphBrightnessTable {
    pub fn with_chars<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self::from_rasterizer(BitmapFont, chars)
    }
}

impl Default for GlyphBrightnessTable {
    fn default() -> Self {
        Self::new(BitmapFont)
    }
}

impl<R: GlyphRasterizer> GlyphBrightnessTable<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer, chars: BTreeSet::new(), index: GlyphIndex::default() }
    }

    pub fn from_rasterizer<I: IntoIterator<Item = char>>(rasterizer: R, chars: I) -> Self {
        let mut table = Self::new(rasterizer);
        table.chars.extend(chars);
        table.rebuild();
        table
    }

    /// Add `symbol`, returning whether the set changed.
    pub fn add(&mut self, symbol: char) -> bool {
        let inserted = self.chars.insert(symbol);
        if inserted {
            self.rebuild();
        }
        inserted
    }

    /// Remove `symbol`, returning whether the set changed.
    pub fn remove(&mut self, symbol: char) -> bool {
        let removed = self.chars.remove(&symbol);
        if removed {
            self.rebuild();
        }
        removed
    }

    /// Add several characters with a single rebuild. Returns how many were new.
    pub fn add_all<I: IntoIterator<Item = char>>(&mut self, symbols: I) -> usize {
        let added = symbols.into_iter().filter(|&symbol| self.chars.insert(symbol)).count();
        if added > 0 {
            self.rebuild();
        }
        added
    }

    /// Remove several characters with a single rebuild. Returns how many were
    /// present.
    pub fn remove_all<I: IntoIterator<Item = char>>(&mut self, symbols: I) -> usize {
        let removed = symbols.into_iter().filter(|symbol| self.chars.remove(symbol)).count();
        if removed > 0 {
            self.rebuild();
        }
        removed
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.chars.contains(&symbol)
    }

    /// Active characters in ascending code order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn index(&self) -> &GlyphIndex {
        &self.index
    }

    fn rebuild(&mut self) {
        let mut entries: BTreeMap<BrightnessKey, Vec<char>> = BTreeMap::new();

        let mut symbols = self.chars.iter().copied();
        match (symbols.next(), symbols.next()) {
            (None, _) => {},
            (Some(symbol), None) => {
                // A lone character keeps its raw brightness as key.
                let raw = self.rasterizer.mask(symbol).raw_brightness();
                entries.insert(BrightnessKey(raw), vec![symbol]);
            },
            _ => {
                let raw: Vec<(char, f64)> = self
                    .chars
                    .iter()
                    .map(|&symbol| (symbol, self.rasterizer.mask(symbol).raw_brightness()))
                    .collect();
                let min = raw.iter().map(|&(_, b)| b).fold(f64::INFINITY, f64::min);
                let max = raw.iter().map(|&(_, b)| b).fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;

                // Characters arrive in ascending order, so each group stays sorted.
                for (symbol, brightness) in raw {
                    let normalized =
                        if range == 0.0 { 0.5 } else { (brightness - min) / range };
                    entries.entry(BrightnessKey(normalized)).or_default().push(symbol);
                }
            },
        }

        log::debug!(
            "rebuilt glyph index: {} characters, {} brightness levels",
            self.chars.len(),
            entries.len()
        );
        self.index = GlyphIndex { entries };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::raster::GlyphMask;

    /// Rasterizer inking `n` cells for the `n`-th lowercase letter and the
    /// same 64 cells for every other character.
    fn letters(symbol: char) -> GlyphMask {
        if symbol.is_ascii_lowercase() {
            GlyphMask::with_coverage(symbol as usize - 'a' as usize)
        } else {
            GlyphMask::with_coverage(64)
        }
    }

    #[test]
    fn empty_table_has_empty_index() {
        let table = GlyphBrightnessTable::new(letters);
        assert!(table.index().is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn single_character_keeps_raw_brightness() {
        let table = GlyphBrightnessTable::from_rasterizer(letters, ['e']);
        let entries: Vec<_> = table.index().entries().collect();
        assert_eq!(entries, vec![(4.0 / 256.0, &['e'][..])]);
    }

    #[test]
    fn uniform_brightness_maps_to_half() {
        let table = GlyphBrightnessTable::from_rasterizer(letters, ['X', '#', 'Q']);
        let entries: Vec<_> = table.index().entries().collect();
        assert_eq!(entries, vec![(0.5, &['#', 'Q', 'X'][..])]);
    }

    #[test]
    fn blank_glyphs_map_to_half() {
        let blank = |_: char| GlyphMask::blank();
        let table = GlyphBrightnessTable::from_rasterizer(blank, [' ', '.']);
        let entries: Vec<_> = table.index().entries().collect();

        assert_eq!(entries, vec![(0.5, &[' ', '.'][..])]);
        assert_eq!(table.index().best_match(0.0).unwrap(), ' ');
        assert_eq!(table.index().best_match(1.0).unwrap(), ' ');
    }

    #[test]
    fn extremes_normalize_to_zero_and_one() {
        let table = GlyphBrightnessTable::from_rasterizer(letters, ['a', 'c', 'e']);
        assert_eq!(table.index().brightness_of('a'), Some(0.0));
        assert_eq!(table.index().brightness_of('c'), Some(0.5));
        assert_eq!(table.index().brightness_of('e'), Some(1.0));
    }

    #[test]
    fn equal_brightness_shares_one_entry() {
        let table = GlyphBrightnessTable::from_rasterizer(letters, ['Z', 'a', 'B', 'z']);
        let entries: Vec<_> = table.index().entries().collect();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].1, &['a'][..]);
        assert_eq!(entries[1].1, &['z'][..]);
        assert_eq!(entries[2].1, &['B', 'Z'][..]);
    }

    #[test]
    fn mutations_renormalize_the_whole_set() {
        let mut table = GlyphBrightnessTable::from_rasterizer(letters, ['a', 'e']);
        assert_eq!(table.index().brightness_of('e'), Some(1.0));

        assert!(table.add('i'));
        assert!(!table.add('i'));
        assert_eq!(table.index().brightness_of('e'), Some(0.5));

        assert!(table.remove('a'));
        assert!(!table.remove('a'));
        assert_eq!(table.index().brightness_of('e'), Some(0.0));
        assert_eq!(table.index().brightness_of('a'), None);

        assert!(table.remove('i'));
        assert_eq!(table.index().brightness_of('e'), Some(4.0 / 256.0));
    }

    #[test]
    fn bulk_mutations_report_changes() {
        let mut table = GlyphBrightnessTable::with_chars('0'..='9');
        assert_eq!(table.add_all(PRINTABLE_CHARS), 85);
        assert_eq!(table.len(), 95);
        assert_eq!(table.remove_all('a'..='z'), 26);
        assert_eq!(table.remove_all('a'..='z'), 0);
        assert!(!table.contains('q'));

        let listed: usize = table.index().entries().map(|(_, chars)| chars.len()).sum();
        assert_eq!(listed, table.len());
    }
}
