//! Index deserialization
//!
//! Parses the blob produced by [`writer`](super::writer), validating the
//! magic number, format version and every length field before touching the
//! payload. Rank checkpoints and the C table are rebuilt from the stored
//! BWT; only the suffix-array samples travel in the blob.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{FmxError, Result};

use super::fm_index::FmIndex;
use super::types::{FmIndexConfig, IndexHeader, IndexMeta, INDEX_MAGIC, INDEX_VERSION};

fn read_u32(blob: &[u8], offset: &mut usize, what: &str) -> Result<u32> {
    let end = *offset + 4;
    let bytes = blob
        .get(*offset..end)
        .ok_or_else(|| FmxError::Format(format!("truncated before {what}")))?;
    *offset = end;
    Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
}

fn read_u64(blob: &[u8], offset: &mut usize, what: &str) -> Result<u64> {
    let end = *offset + 8;
    let bytes = blob
        .get(*offset..end)
        .ok_or_else(|| FmxError::Format(format!("truncated before {what}")))?;
    *offset = end;
    Ok(u64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
}

fn read_slice<'a>(blob: &'a [u8], offset: &mut usize, len: usize, what: &str) -> Result<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| FmxError::Format(format!("{what} length overflows")))?;
    let bytes = blob
        .get(*offset..end)
        .ok_or_else(|| FmxError::Format(format!("truncated inside {what}")))?;
    *offset = end;
    Ok(bytes)
}

/// Deserialize an index from a byte blob
pub fn read_index(blob: &[u8]) -> Result<FmIndex> {
    if blob.len() < IndexHeader::SIZE {
        return Err(FmxError::Format("blob smaller than header".to_string()));
    }

    let mut offset = 0;

    let magic = read_u32(blob, &mut offset, "magic")?;
    if magic != INDEX_MAGIC {
        return Err(FmxError::Format("bad magic number".to_string()));
    }

    let version = read_u32(blob, &mut offset, "version")?;
    if version != INDEX_VERSION {
        return Err(FmxError::UnsupportedVersion {
            expected: INDEX_VERSION,
            actual: version,
        });
    }

    let _flags = read_u32(blob, &mut offset, "flags")?;

    let meta_len = read_u32(blob, &mut offset, "metadata length")? as usize;
    let meta_bytes = read_slice(blob, &mut offset, meta_len, "metadata")?;
    let meta: IndexMeta = serde_json::from_slice(meta_bytes)
        .map_err(|e| FmxError::Format(format!("metadata: {e}")))?;

    let bwt_len = read_u64(blob, &mut offset, "BWT length")?;
    if Some(bwt_len) != meta.text_len.checked_add(1) {
        return Err(FmxError::Format(
            "BWT length disagrees with metadata text length".to_string(),
        ));
    }
    let bwt_len = bwt_len as usize;
    let bwt = read_slice(blob, &mut offset, bwt_len, "BWT")?.to_vec();

    let sample_count = read_u64(blob, &mut offset, "sample count")? as usize;
    if sample_count != meta.sample_count as usize {
        return Err(FmxError::Format(
            "sample count disagrees with metadata".to_string(),
        ));
    }
    if sample_count > bwt_len {
        return Err(FmxError::Format("more samples than BWT rows".to_string()));
    }

    let mut rows = Vec::with_capacity(sample_count);
    for _ in 0..sample_count {
        let row = read_u64(blob, &mut offset, "sample row")? as usize;
        if row >= bwt_len {
            return Err(FmxError::Format("sample row out of range".to_string()));
        }
        if let Some(&prev) = rows.last() {
            if row <= prev {
                return Err(FmxError::Format("sample rows not ascending".to_string()));
            }
        }
        rows.push(row);
    }

    let mut values = Vec::with_capacity(sample_count);
    for _ in 0..sample_count {
        let value = read_u64(blob, &mut offset, "sample value")? as usize;
        if value >= bwt_len {
            return Err(FmxError::Format("sample value out of range".to_string()));
        }
        values.push(value);
    }

    if offset != blob.len() {
        return Err(FmxError::Format("trailing bytes after payload".to_string()));
    }

    let config = FmIndexConfig {
        sa_sample_stride: meta.sa_sample_stride as usize,
        rank_block_size: meta.rank_block_size as usize,
    };

    FmIndex::from_parts(config, meta.text_len as usize, bwt, rows, values)
}

/// Memory-map `path` and deserialize the index it contains
pub fn open_file(path: &Path) -> Result<FmIndex> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    read_index(&mmap)
}
