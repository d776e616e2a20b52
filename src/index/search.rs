//! Backward search and locate resolution
//!
//! **Core Algorithm**: consume the pattern right to left, maintaining the
//! half-open interval of BWT rows whose suffixes start with the pattern
//! suffix matched so far. One step per pattern byte:
//!
//! `new_bound = C[c] + rank(c, bound)`
//!
//! The interval narrows monotonically; the moment it collapses the search
//! stops and reports no matches. The final width is the exact occurrence
//! count, overlaps included. Locate then walks each surviving row backwards
//! through the LF-mapping to the nearest sampled row, which pins the
//! original text offset.

use std::ops::Range;

use super::bwt::SuffixSamples;
use super::ctable::CTable;
use super::rank::RankTable;
use super::types::TextPosition;

/// Interval-narrowing query engine over the rank and C tables
pub struct BackwardSearch<'a> {
    ranks: &'a RankTable,
    ctable: &'a CTable,
}

impl<'a> BackwardSearch<'a> {
    pub fn new(ranks: &'a RankTable, ctable: &'a CTable) -> Self {
        Self { ranks, ctable }
    }

    /// Narrow the full row interval down to the rows prefixed by `pattern`
    ///
    /// Returns the half-open row range; its length is the occurrence count.
    /// The empty pattern matches every row. Patterns are validated at the
    /// facade, so no byte here can be the sentinel.
    pub fn search(&self, pattern: &[u8]) -> Range<usize> {
        let row_count = self.ranks.len();

        if pattern.is_empty() {
            return 0..row_count;
        }

        let mut lo = 0;
        let mut hi = row_count;

        for &c in pattern.iter().rev() {
            let base = self.ctable.cumulative_before(c);
            lo = base + self.ranks.rank(c, lo);
            hi = base + self.ranks.rank(c, hi);

            if hi <= lo {
                return lo..lo;
            }
        }

        lo..hi
    }
}

/// Maps BWT rows back to original text offsets via sampled suffix-array rows
pub struct LocateResolver<'a> {
    ranks: &'a RankTable,
    ctable: &'a CTable,
    samples: &'a SuffixSamples,
}

impl<'a> LocateResolver<'a> {
    pub fn new(ranks: &'a RankTable, ctable: &'a CTable, samples: &'a SuffixSamples) -> Self {
        Self {
            ranks,
            ctable,
            samples,
        }
    }

    /// Recover the text offset of the suffix in `row`
    ///
    /// Walks the LF-mapping until a sampled row is reached; each step moves
    /// one position earlier in the text, so the walk is bounded by the
    /// sampling stride and terminates at position 0 at the latest.
    pub fn resolve_row(&self, mut row: usize) -> TextPosition {
        let mut steps = 0;

        loop {
            if let Some(pos) = self.samples.value_at_row(row) {
                return pos + steps;
            }

            let c = self.ranks.symbol_at(row);
            row = self.ctable.cumulative_before(c) + self.ranks.rank(c, row);
            steps += 1;
        }
    }
}

/// Lazy iterator over the text offsets of a match interval, in row order
///
/// Resolves one row per `next` call; no allocation beyond the iterator
/// itself. Offsets come out in BWT row order, not text order.
pub struct Occurrences<'a> {
    resolver: LocateResolver<'a>,
    range: Range<usize>,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(resolver: LocateResolver<'a>, range: Range<usize>) -> Self {
        Self { resolver, range }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = TextPosition;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let row = self.range.next()?;
        Some(self.resolver.resolve_row(row))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for Occurrences<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::bwt::{bwt_from_suffix_array, sample_suffix_array};
    use crate::index::suffix_array::build_suffix_array;

    fn build_parts(text: &[u8], stride: usize, block_size: usize) -> (RankTable, CTable, SuffixSamples) {
        let mut seq = text.to_vec();
        seq.push(0x00);
        let sa = build_suffix_array(&seq);
        let bwt = bwt_from_suffix_array(&seq, &sa);
        let samples = sample_suffix_array(&sa, stride);
        let ranks = RankTable::new(bwt, block_size);
        let ctable = CTable::from_symbol_counts(ranks.totals());
        (ranks, ctable, samples)
    }

    #[test]
    fn test_search_mississippi() {
        let (ranks, ctable, _) = build_parts(b"mississippi", 4, 4);
        let engine = BackwardSearch::new(&ranks, &ctable);

        assert_eq!(engine.search(b"issi").len(), 2);
        assert_eq!(engine.search(b"mississippi").len(), 1);
        assert_eq!(engine.search(b"ssi").len(), 2);
        assert_eq!(engine.search(b"xyz").len(), 0);
    }

    #[test]
    fn test_search_empty_pattern_spans_all_rows() {
        let (ranks, ctable, _) = build_parts(b"hello", 4, 4);
        let engine = BackwardSearch::new(&ranks, &ctable);

        assert_eq!(engine.search(b""), 0..6);
    }

    #[test]
    fn test_search_short_circuits_to_empty_interval() {
        let (ranks, ctable, _) = build_parts(b"abracadabra", 4, 4);
        let engine = BackwardSearch::new(&ranks, &ctable);

        // 'q' never occurs, so the first step already collapses
        let range = engine.search(b"aaaaaaaaaaaaaaaaq");
        assert!(range.is_empty());
    }

    #[test]
    fn test_search_interval_width_counts_overlaps() {
        let (ranks, ctable, _) = build_parts(b"aaaa", 1, 1);
        let engine = BackwardSearch::new(&ranks, &ctable);

        assert_eq!(engine.search(b"aa").len(), 3);
        assert_eq!(engine.search(b"aaa").len(), 2);
        assert_eq!(engine.search(b"aaaa").len(), 1);
        assert_eq!(engine.search(b"aaaaa").len(), 0);
    }

    #[test]
    fn test_resolver_matches_suffix_array() {
        let mut seq = b"banana".to_vec();
        seq.push(0x00);
        let sa = build_suffix_array(&seq);

        for stride in [1, 3, 100] {
            let (ranks, ctable, samples) = build_parts(b"banana", stride, 2);
            let resolver = LocateResolver::new(&ranks, &ctable, &samples);

            for (row, &pos) in sa.iter().enumerate() {
                assert_eq!(resolver.resolve_row(row), pos, "row {row} stride {stride}");
            }
        }
    }

    #[test]
    fn test_occurrences_iterator() {
        let (ranks, ctable, samples) = build_parts(b"abracadabra", 2, 3);
        let engine = BackwardSearch::new(&ranks, &ctable);
        let range = engine.search(b"abra");

        let resolver = LocateResolver::new(&ranks, &ctable, &samples);
        let occurrences = Occurrences::new(resolver, range);
        assert_eq!(occurrences.len(), 2);

        let mut positions: Vec<_> = occurrences.collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 7]);
    }
}
