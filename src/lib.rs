//! # FMX - Compressed Full-Text Substring Search
//!
//! FMX builds an FM-index over an immutable byte sequence and answers exact
//! substring queries without keeping the original text in plain form. Query
//! cost depends on pattern length, not corpus size, and the index lives in
//! space close to the entropy of the input rather than a full suffix array.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Index construction and the query engine
//!   - `suffix_array` - Suffix sorting over the sentinel-terminated sequence
//!   - `bwt` - Burrows-Wheeler Transform and sparse suffix-array sampling
//!   - `rank` - Checkpointed occurrence counts over the BWT
//!   - `ctable` - Cumulative symbol counts for LF-mapping
//!   - `search` - Backward search and locate resolution
//!   - `writer` / `reader` - Versioned binary export and import
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```
//! use fmx::FmIndex;
//!
//! let index = FmIndex::build(b"abracadabra").unwrap();
//!
//! assert_eq!(index.count(b"abra").unwrap(), 2);
//! assert_eq!(index.locate(b"abra").unwrap(), vec![0, 7]);
//! assert!(index.contains(b"cadabra").unwrap());
//! assert_eq!(index.count(b"xyz").unwrap(), 0);
//! ```
//!
//! ## Index Lifecycle
//!
//! An index is built once and is read-only thereafter. All internal
//! structures are immutable owned arrays, so an `FmIndex` can be queried
//! concurrently from multiple threads without locking. The space/time trade
//! is exposed through [`FmIndexConfig`]: the suffix-array sampling stride
//! governs locate latency versus memory, the rank block size governs rank
//! query latency versus memory.

pub mod error;
pub mod index;

pub use error::{FmxError, Result};
pub use index::{FmIndex, FmIndexConfig, IndexStats, Occurrences};
