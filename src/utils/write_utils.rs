//! TIFF writing utilities
//!
//! Alignment and entry ordering helpers for the TIFF writer.

use crate::errors::RasterResult;
use crate::tiff::ifd::IFDEntry;
use std::io::Write;

/// Align an offset to the next word (2-byte) boundary
///
/// TIFF requires IFDs and payloads to start on a word boundary.
pub fn align_to_word(offset: u64) -> u64 {
    offset + (offset % 2)
}

/// Write one padding byte if `data_len` left the stream on an odd offset
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> RasterResult<()> {
    if data_len % 2 == 1 {
        writer.write_all(&[0u8])?;
    }
    Ok(())
}

/// IFD entries sorted by tag number, as TIFF readers require
pub fn get_sorted_entries(entries: &[IFDEntry]) -> Vec<IFDEntry> {
    let mut sorted_entries = entries.to_vec();
    sorted_entries.sort_by_key(|entry| entry.tag);
    sorted_entries
}
