//! Checkpointed occurrence counts over the BWT
//!
//! Answers `rank(symbol, pos)`: how many times `symbol` occurs in
//! `bwt[0..pos]`. The BWT is partitioned into fixed-size blocks; each block
//! boundary stores an exact snapshot of all 256 symbol counts, and the
//! remainder within a block is counted by scanning at most `block_size`
//! bytes with `memchr`. Block size is the space/time knob: snapshots are
//! 2 KiB each, scans are bounded by the block length.
//!
//! The table owns the BWT bytes and is immutable after construction, so
//! concurrent reads need no coordination.

use memchr::memchr_iter;

use super::types::ALPHABET_SIZE;

/// Occurrence-count table over the BWT
#[derive(Debug)]
pub struct RankTable {
    bwt: Vec<u8>,
    block_size: usize,
    /// Flat snapshot array: `checkpoints[b * 256 + c]` is the number of
    /// occurrences of symbol c in `bwt[0 .. b * block_size]`
    checkpoints: Vec<u64>,
    /// Total occurrences of each symbol across the whole BWT
    totals: [u64; ALPHABET_SIZE],
}

impl RankTable {
    /// Build the checkpoint table over `bwt`
    pub fn new(bwt: Vec<u8>, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        let boundary_count = bwt.len() / block_size + 1;

        let mut checkpoints = Vec::with_capacity(boundary_count * ALPHABET_SIZE);
        let mut counts = [0u64; ALPHABET_SIZE];

        for i in 0..=bwt.len() {
            if i % block_size == 0 {
                checkpoints.extend_from_slice(&counts);
            }
            if i < bwt.len() {
                counts[bwt[i] as usize] += 1;
            }
        }

        Self {
            bwt,
            block_size,
            checkpoints,
            totals: counts,
        }
    }

    /// Count occurrences of `symbol` in `bwt[0..pos]`
    ///
    /// `pos` may range up to and including the BWT length. Nearest-checkpoint
    /// lookup plus an in-block scan bounded by the block size.
    #[inline]
    pub fn rank(&self, symbol: u8, pos: usize) -> usize {
        debug_assert!(pos <= self.bwt.len());

        let block = pos / self.block_size;
        let base = self.checkpoints[block * ALPHABET_SIZE + symbol as usize] as usize;
        let block_start = block * self.block_size;

        base + memchr_iter(symbol, &self.bwt[block_start..pos]).count()
    }

    /// Total occurrences of `symbol` across the whole BWT
    #[inline]
    pub fn total_count(&self, symbol: u8) -> usize {
        self.totals[symbol as usize] as usize
    }

    /// Per-symbol totals, for building the C table
    pub fn totals(&self) -> &[u64; ALPHABET_SIZE] {
        &self.totals
    }

    /// The BWT byte in row `row`
    #[inline]
    pub fn symbol_at(&self, row: usize) -> u8 {
        self.bwt[row]
    }

    /// Number of BWT rows
    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    /// The underlying BWT bytes, for serialization
    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of checkpoint blocks
    pub fn block_count(&self) -> usize {
        self.checkpoints.len() / ALPHABET_SIZE
    }

    /// Approximate heap footprint in bytes
    pub fn heap_bytes(&self) -> usize {
        self.bwt.len() + self.checkpoints.len() * size_of::<u64>()
    }
}
