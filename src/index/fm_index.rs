//! The FM-index facade
//!
//! Owns every structure derived from the indexed sequence and exposes the
//! query surface. Construction runs the full pipeline: validate input,
//! append the sentinel, sort suffixes, derive the BWT and suffix-array
//! samples, then build the rank and C tables. The suffix array itself is
//! dropped once the samples are taken.

use std::path::Path;

use memchr::memchr;

use crate::error::{FmxError, Result};

use super::bwt::{bwt_from_suffix_array, sample_suffix_array, SuffixSamples};
use super::ctable::CTable;
use super::rank::RankTable;
use super::search::{BackwardSearch, LocateResolver, Occurrences};
use super::suffix_array::build_suffix_array;
use super::types::{FmIndexConfig, IndexStats, TextPosition, SENTINEL_BYTE};
use super::{reader, writer};

/// Compressed full-text substring index over a single byte sequence
///
/// Built once, immutable thereafter. All fields are owned flat arrays, so a
/// shared reference can be queried from any number of threads concurrently.
#[derive(Debug)]
pub struct FmIndex {
    config: FmIndexConfig,
    text_len: usize,
    ranks: RankTable,
    ctable: CTable,
    samples: SuffixSamples,
}

impl FmIndex {
    /// Build an index over `text` with the default configuration
    ///
    /// The empty sequence is legal: the index then contains only the
    /// sentinel and every non-empty pattern has zero matches.
    pub fn build(text: &[u8]) -> Result<Self> {
        Self::build_with_config(text, FmIndexConfig::default())
    }

    /// Build an index over `text` with an explicit space/time configuration
    ///
    /// Fails with [`FmxError::SentinelInInput`] if `text` contains the
    /// reserved sentinel byte 0x00.
    pub fn build_with_config(text: &[u8], config: FmIndexConfig) -> Result<Self> {
        if let Some(offset) = memchr(SENTINEL_BYTE, text) {
            return Err(FmxError::SentinelInInput { offset });
        }
        let config = config.clamped();

        let mut seq = Vec::with_capacity(text.len() + 1);
        seq.extend_from_slice(text);
        seq.push(SENTINEL_BYTE);

        let sa = build_suffix_array(&seq);
        let bwt = bwt_from_suffix_array(&seq, &sa);
        let samples = sample_suffix_array(&sa, config.sa_sample_stride);
        drop(sa);
        drop(seq);

        let ranks = RankTable::new(bwt, config.rank_block_size);
        let ctable = CTable::from_symbol_counts(ranks.totals());

        Ok(Self {
            config,
            text_len: text.len(),
            ranks,
            ctable,
            samples,
        })
    }

    /// Reassemble an index from deserialized parts, rebuilding the derived
    /// rank and C tables from the BWT
    pub(crate) fn from_parts(
        config: FmIndexConfig,
        text_len: usize,
        bwt: Vec<u8>,
        sample_rows: Vec<usize>,
        sample_values: Vec<TextPosition>,
    ) -> Result<Self> {
        let config = config.clamped();
        let ranks = RankTable::new(bwt, config.rank_block_size);

        if ranks.total_count(SENTINEL_BYTE) != 1 {
            return Err(FmxError::Format(
                "BWT does not contain exactly one sentinel".to_string(),
            ));
        }

        let ctable = CTable::from_symbol_counts(ranks.totals());
        let samples = SuffixSamples::from_parts(config.sa_sample_stride, sample_rows, sample_values);

        Ok(Self {
            config,
            text_len,
            ranks,
            ctable,
            samples,
        })
    }

    fn validate_pattern(pattern: &[u8]) -> Result<()> {
        match memchr(SENTINEL_BYTE, pattern) {
            Some(offset) => Err(FmxError::SentinelInPattern { offset }),
            None => Ok(()),
        }
    }

    /// Row interval whose suffixes start with `pattern`. For the empty
    /// pattern the sentinel row is excluded, leaving one row per text offset.
    fn match_interval(&self, pattern: &[u8]) -> Result<std::ops::Range<usize>> {
        Self::validate_pattern(pattern)?;

        let mut range = BackwardSearch::new(&self.ranks, &self.ctable).search(pattern);
        if pattern.is_empty() {
            range.start = 1;
        }
        Ok(range)
    }

    /// Number of occurrences of `pattern`, overlaps included
    ///
    /// The empty pattern matches once per text offset. Cost is one rank pair
    /// per pattern byte; no locate work is done.
    pub fn count(&self, pattern: &[u8]) -> Result<usize> {
        Ok(self.match_interval(pattern)?.len())
    }

    /// Whether `pattern` occurs at least once
    pub fn contains(&self, pattern: &[u8]) -> Result<bool> {
        Ok(!self.match_interval(pattern)?.is_empty())
    }

    /// All start offsets of `pattern`, sorted ascending
    ///
    /// Returns an empty vector when the pattern is absent. The empty pattern
    /// yields every offset `0..text_len`.
    pub fn locate(&self, pattern: &[u8]) -> Result<Vec<TextPosition>> {
        let mut positions: Vec<TextPosition> = self.occurrences(pattern)?.collect();
        positions.sort_unstable();
        Ok(positions)
    }

    /// Lazy variant of [`locate`](Self::locate): resolves offsets one match
    /// at a time, in BWT row order
    pub fn occurrences(&self, pattern: &[u8]) -> Result<Occurrences<'_>> {
        let range = self.match_interval(pattern)?;
        let resolver = LocateResolver::new(&self.ranks, &self.ctable, &self.samples);
        Ok(Occurrences::new(resolver, range))
    }

    /// Original text length, excluding the sentinel
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Number of BWT rows (text length plus sentinel)
    pub fn row_count(&self) -> usize {
        self.ranks.len()
    }

    /// The configuration this index was built with
    pub fn config(&self) -> &FmIndexConfig {
        &self.config
    }

    /// Recover the original text by inverting the BWT
    ///
    /// Walks the LF-mapping once around the full sequence, emitting bytes
    /// last to first. Linear in the text length; mainly useful to verify
    /// that the index alone still determines the text.
    pub fn reconstruct_text(&self) -> Vec<u8> {
        let n = self.text_len;
        let mut out = vec![0u8; n];

        // Row 0 is the sentinel row; its BWT byte is the last text byte.
        let mut row = 0;
        for slot in out.iter_mut().rev() {
            let c = self.ranks.symbol_at(row);
            *slot = c;
            row = self.ctable.cumulative_before(c) + self.ranks.rank(c, row);
        }

        out
    }

    /// Statistics about the built structures
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            text_len: self.text_len,
            row_count: self.ranks.len(),
            sample_count: self.samples.len(),
            block_count: self.ranks.block_count(),
            heap_bytes: self.ranks.heap_bytes() + self.samples.len() * 2 * size_of::<usize>(),
        }
    }

    /// Serialize the index to an opaque, versioned byte blob
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        writer::write_index(self)
    }

    /// Deserialize an index previously produced by [`to_bytes`](Self::to_bytes)
    pub fn from_bytes(blob: &[u8]) -> Result<Self> {
        reader::read_index(blob)
    }

    /// Write the serialized index to a file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        writer::write_to_file(self, path)
    }

    /// Memory-map a serialized index file and deserialize it
    pub fn open_file(path: &Path) -> Result<Self> {
        reader::open_file(path)
    }

    pub(crate) fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    pub(crate) fn samples(&self) -> &SuffixSamples {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_count() {
        let index = FmIndex::build(b"abracadabra").unwrap();

        assert_eq!(index.count(b"abra").unwrap(), 2);
        assert_eq!(index.count(b"bra").unwrap(), 2);
        assert_eq!(index.count(b"a").unwrap(), 5);
        assert_eq!(index.count(b"abracadabra").unwrap(), 1);
        assert_eq!(index.count(b"xyz").unwrap(), 0);
    }

    #[test]
    fn test_locate_sorted_ascending() {
        let index = FmIndex::build(b"abracadabra").unwrap();

        assert_eq!(index.locate(b"abra").unwrap(), vec![0, 7]);
        assert_eq!(index.locate(b"a").unwrap(), vec![0, 3, 5, 7, 10]);
        assert_eq!(index.locate(b"xyz").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_hello_there_scenario() {
        let index = FmIndex::build(b"hello-there").unwrap();

        assert_eq!(index.count(b"hello").unwrap(), 1);
        assert_eq!(index.locate(b"hello").unwrap(), vec![0]);
        assert_eq!(index.count(b"l").unwrap(), 2);
        assert_eq!(index.locate(b"l").unwrap(), vec![2, 3]);
        assert_eq!(index.count(b"z").unwrap(), 0);
        assert_eq!(index.locate(b"z").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_overlapping_occurrences() {
        let index = FmIndex::build(b"aaaa").unwrap();

        assert_eq!(index.count(b"aa").unwrap(), 3);
        assert_eq!(index.locate(b"aa").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_pattern_conventions() {
        let index = FmIndex::build(b"hello").unwrap();

        assert_eq!(index.count(b"").unwrap(), 5);
        assert_eq!(index.locate(b"").unwrap(), vec![0, 1, 2, 3, 4]);
        assert!(index.contains(b"").unwrap());
    }

    #[test]
    fn test_empty_text() {
        let index = FmIndex::build(b"").unwrap();

        assert_eq!(index.text_len(), 0);
        assert_eq!(index.row_count(), 1);
        assert_eq!(index.count(b"").unwrap(), 0);
        assert_eq!(index.locate(b"").unwrap(), Vec::<usize>::new());
        assert_eq!(index.count(b"a").unwrap(), 0);
        assert!(!index.contains(b"").unwrap());
        assert!(index.reconstruct_text().is_empty());
    }

    #[test]
    fn test_pattern_longer_than_text() {
        let index = FmIndex::build(b"abc").unwrap();

        assert_eq!(index.count(b"abcd").unwrap(), 0);
        assert_eq!(index.locate(b"abcd").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_whole_text_pattern() {
        let index = FmIndex::build(b"exactmatch").unwrap();

        assert_eq!(index.count(b"exactmatch").unwrap(), 1);
        assert_eq!(index.locate(b"exactmatch").unwrap(), vec![0]);
    }

    #[test]
    fn test_sentinel_in_input_rejected() {
        let err = FmIndex::build(b"he\x00llo").unwrap_err();
        assert!(matches!(err, FmxError::SentinelInInput { offset: 2 }));
    }

    #[test]
    fn test_sentinel_in_pattern_rejected() {
        let index = FmIndex::build(b"hello").unwrap();

        let err = index.count(b"he\x00").unwrap_err();
        assert!(matches!(err, FmxError::SentinelInPattern { offset: 2 }));
        assert!(index.locate(b"\x00").is_err());
        assert!(index.contains(b"\x00").is_err());
    }

    #[test]
    fn test_reconstruct_text() {
        for text in [
            b"banana".as_slice(),
            b"mississippi",
            b"the quick brown fox jumps over the lazy dog",
            b"a",
        ] {
            let index = FmIndex::build(text).unwrap();
            assert_eq!(index.reconstruct_text(), text);
        }
    }

    #[test]
    fn test_occurrences_iterator_is_lazy_and_exact() {
        let index = FmIndex::build(b"abracadabra").unwrap();

        let occurrences = index.occurrences(b"a").unwrap();
        assert_eq!(occurrences.len(), 5);
        assert_eq!(occurrences.take(2).count(), 2);
    }

    #[test]
    fn test_stats() {
        let index = FmIndex::build(b"abracadabra").unwrap();
        let stats = index.stats();

        assert_eq!(stats.text_len, 11);
        assert_eq!(stats.row_count, 12);
        assert!(stats.sample_count >= 1);
        assert!(stats.block_count >= 1);
        assert!(stats.heap_bytes > 0);
    }

    #[test]
    fn test_custom_config() {
        let config = FmIndexConfig {
            sa_sample_stride: 1,
            rank_block_size: 2,
        };
        let index = FmIndex::build_with_config(b"mississippi", config).unwrap();

        assert_eq!(index.count(b"issi").unwrap(), 2);
        assert_eq!(index.locate(b"ssi").unwrap(), vec![2, 5]);
        assert_eq!(index.config().sa_sample_stride, 1);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FmIndex>();
    }
}
