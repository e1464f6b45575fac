//! TIFF validation utilities
//!
//! Bounds checks applied while walking a possibly malformed file.

use log::{error, warn};
use std::io::SeekFrom;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::errors::{RasterError, RasterResult};
use crate::tiff::constants::header;

/// Validates that an IFD offset points inside the file, past the header
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> RasterResult<()> {
    if offset >= file_size || offset < header::CLASSIC_HEADER_SIZE {
        return Err(RasterError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Validates that a payload lies entirely inside the file
pub fn validate_data_range(offset: u64, length: u64, file_size: u64) -> RasterResult<()> {
    match offset.checked_add(length) {
        Some(end) if end <= file_size => Ok(()),
        _ => Err(RasterError::GenericError(format!(
            "Data range {}+{} exceeds file size {}",
            offset, length, file_size
        ))),
    }
}

/// Gets the stream size, restoring the current position
///
/// Falls back to u64::MAX when the size can't be determined.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> RasterResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates the BigTIFF header
///
/// After the version number BigTIFF stores the offset size (always 8)
/// and a reserved zero.
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler,
) -> RasterResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(RasterError::InvalidBigTIFFHeader);
    }

    Ok(())
}
