//! IFD chain utilities

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::errors::RasterResult;

/// Reads an IFD offset (header or chain link) in the file's offset width
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler,
) -> RasterResult<u64> {
    if is_big_tiff {
        Ok(byte_order_handler.read_u64(reader)?)
    } else {
        Ok(byte_order_handler.read_u32(reader)? as u64)
    }
}

/// Size in bytes of an IFD with `entry_count` entries
///
/// Used to locate the next-IFD link and to lay out directories when writing.
pub fn calculate_ifd_size(entry_count: usize, is_big_tiff: bool) -> u64 {
    let entries = entry_count as u64;
    if is_big_tiff {
        // 8 (entry count) + 20 per entry + 8 (next IFD offset)
        8 + (20 * entries) + 8
    } else {
        // 2 (entry count) + 12 per entry + 4 (next IFD offset)
        2 + (12 * entries) + 4
    }
}
