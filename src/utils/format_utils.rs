//! TIFF format detection
//!
//! Byte order and classic/BigTIFF detection from the file header.

use log::debug;
use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::errors::{RasterError, RasterResult};
use crate::tiff::constants::header;
use crate::tiff::validation;

/// Detects and returns the byte order handler for a TIFF file
pub fn detect_byte_order(reader: &mut dyn SeekableReader) -> RasterResult<Box<dyn ByteOrderHandler>> {
    let byte_order = ByteOrder::detect(reader)?;
    debug!("Detected byte order: {}", byte_order.name());

    Ok(byte_order.create_handler())
}

/// Detects whether a file is TIFF or BigTIFF from its version number
///
/// # Returns
/// A tuple with (is_big_tiff, version_number)
pub fn detect_tiff_format(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler,
) -> RasterResult<(bool, u16)> {
    let version = byte_order_handler.read_u16(reader)?;
    debug!("TIFF version: {}", version);

    let is_big_tiff = match version {
        header::BIG_TIFF_VERSION => {
            validation::validate_bigtiff_header(reader, byte_order_handler)?;
            true
        },
        header::TIFF_VERSION => false,
        _ => return Err(RasterError::UnsupportedVersion(version)),
    };

    Ok((is_big_tiff, version))
}
