//! GeoTIFF codec
//!
//! Reads TIFF and BigTIFF files in either byte order and writes classic
//! little-endian GeoTIFFs with one strip per band.

pub mod ifd;
pub mod types;
pub mod reader;
pub mod builder;
pub(crate) mod builders;
pub mod constants;
pub mod geo_key_parser;
pub(crate) mod validation;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use geo_key_parser::{GeoKeyEntry, GeoKeyParser, get_key_name};
pub use builder::TiffBuilder;
