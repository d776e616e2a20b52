//! Index serialization
//!
//! Produces the opaque, versioned blob that [`reader`](super::reader)
//! accepts. Layout, all integers little-endian:
//!
//! - header: magic, version, flags (u32 each)
//! - metadata: u32 length prefix + JSON ([`IndexMeta`])
//! - BWT: u64 length prefix + raw bytes
//! - samples: u64 count, then sampled row indexes, then their suffix-array
//!   values (u64 each)
//!
//! Rank checkpoints and the C table are derived from the BWT and rebuilt on
//! import; the suffix-array samples are not derivable and are stored.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{FmxError, Result};

use super::fm_index::FmIndex;
use super::types::{IndexHeader, IndexMeta, INDEX_VERSION};

/// Serialize `index` into a self-contained byte blob
pub fn write_index(index: &FmIndex) -> Result<Vec<u8>> {
    let samples = index.samples();
    let bwt = index.ranks().bwt();

    let meta = IndexMeta {
        version: INDEX_VERSION,
        text_len: index.text_len() as u64,
        sa_sample_stride: index.config().sa_sample_stride as u64,
        rank_block_size: index.config().rank_block_size as u64,
        sample_count: samples.len() as u64,
    };
    let meta_json =
        serde_json::to_vec(&meta).map_err(|e| FmxError::Format(e.to_string()))?;

    let mut blob = Vec::with_capacity(
        IndexHeader::SIZE + 4 + meta_json.len() + 8 + bwt.len() + 8 + samples.len() * 16,
    );

    // Header
    let header = IndexHeader::new();
    blob.extend_from_slice(&header.magic.to_le_bytes());
    blob.extend_from_slice(&header.version.to_le_bytes());
    blob.extend_from_slice(&header.flags.to_le_bytes());

    // Metadata
    blob.extend_from_slice(&(meta_json.len() as u32).to_le_bytes());
    blob.extend_from_slice(&meta_json);

    // BWT
    blob.extend_from_slice(&(bwt.len() as u64).to_le_bytes());
    blob.extend_from_slice(bwt);

    // Suffix-array samples
    blob.extend_from_slice(&(samples.len() as u64).to_le_bytes());
    for &row in samples.rows() {
        blob.extend_from_slice(&(row as u64).to_le_bytes());
    }
    for &value in samples.values() {
        blob.extend_from_slice(&(value as u64).to_le_bytes());
    }

    Ok(blob)
}

/// Serialize `index` and write it to `path`
pub fn write_to_file(index: &FmIndex, path: &Path) -> Result<()> {
    let blob = write_index(index)?;

    let mut file = BufWriter::with_capacity(65536, File::create(path)?);
    file.write_all(&blob)?;
    file.flush()?;

    Ok(())
}
