//! Suffix array construction
//!
//! Builds the suffix array of the sentinel-terminated sequence by sorting
//! suffix positions with full lexicographic byte comparison. The sentinel is
//! the unique smallest byte, so no two suffixes compare equal and the sort
//! order is total.
//!
//! The resulting array is transient: it is consumed by the BWT encoder and
//! the suffix-array sampler, then dropped.

use rayon::prelude::*;

/// Above this length, sort suffixes in parallel
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Build the suffix array of a sentinel-terminated sequence
///
/// `seq` must end with the sentinel byte and contain it nowhere else; the
/// caller (the build pipeline) guarantees this. Returns a permutation of
/// `0..seq.len()` ordering all suffixes lexicographically.
///
/// Time: O(n log n) comparisons, each bounded by the longest common prefix
/// of the two suffixes. For large sequences the sort runs in parallel.
pub fn build_suffix_array(seq: &[u8]) -> Vec<usize> {
    let n = seq.len();

    let mut sa: Vec<usize> = (0..n).collect();

    if n > PARALLEL_SORT_THRESHOLD {
        sa.par_sort_unstable_by(|&a, &b| seq[a..].cmp(&seq[b..]));
    } else {
        sa.sort_unstable_by(|&a, &b| seq[a..].cmp(&seq[b..]));
    }

    sa
}
