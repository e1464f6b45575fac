//! TIFF tag utilities
//!
//! Decoding of tag payloads and human-readable tag names.

use std::io::Cursor;
use byteorder::ReadBytesExt;

use crate::io::byte_order::ByteOrderHandler;
use crate::errors::{RasterError, RasterResult};
use crate::tiff::ifd::IFDEntry;
use crate::tiff::constants::{field_types, tags, compression};

/// Decodes an integer-typed tag payload into u64 values
///
/// # Arguments
/// * `bytes` - Raw payload in the file's byte order
/// * `entry` - The IFD entry describing the payload
/// * `handler` - The byte order handler
pub fn decode_integer_values(
    bytes: &[u8],
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
) -> RasterResult<Vec<u64>> {
    let mut cursor = Cursor::new(bytes);
    let mut values = Vec::with_capacity(entry.count as usize);

    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => cursor.read_u8()? as u64,
            field_types::SHORT => handler.read_u16(&mut cursor)? as u64,
            field_types::SSHORT => handler.read_i16(&mut cursor)? as i64 as u64,
            field_types::LONG => handler.read_u32(&mut cursor)? as u64,
            field_types::SLONG => handler.read_i32(&mut cursor)? as i64 as u64,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => handler.read_u64(&mut cursor)?,
            _ => return Err(RasterError::UnsupportedFieldType(entry.field_type)),
        };
        values.push(value);
    }

    Ok(values)
}

/// Decodes a floating point tag payload (DOUBLE or FLOAT) into f64 values
pub fn decode_double_values(
    bytes: &[u8],
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
) -> RasterResult<Vec<f64>> {
    let mut cursor = Cursor::new(bytes);
    let mut values = Vec::with_capacity(entry.count as usize);

    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::DOUBLE => handler.read_f64(&mut cursor)?,
            field_types::FLOAT => handler.read_f32(&mut cursor)? as f64,
            _ => return Err(RasterError::UnsupportedFieldType(entry.field_type)),
        };
        values.push(value);
    }

    Ok(values)
}

/// Get the name of a TIFF tag
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::SOFTWARE => "Software",
        tags::PREDICTOR => "Predictor",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::EXTRA_SAMPLES => "ExtraSamples",
        tags::SAMPLE_FORMAT => "SampleFormat",

        tags::MODEL_PIXEL_SCALE_TAG => "ModelPixelScale",
        tags::MODEL_TIEPOINT_TAG => "ModelTiepoint",
        tags::MODEL_TRANSFORMATION_TAG => "ModelTransformation",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectory",
        tags::GEO_DOUBLE_PARAMS_TAG => "GeoDoubleParams",
        tags::GEO_ASCII_PARAMS_TAG => "GeoAsciiParams",

        tags::GDAL_METADATA => "GDALMetadata",
        tags::GDAL_NODATA => "GDALNoData",

        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

/// Get the name of a compression method
pub fn get_compression_name(compression_code: u64) -> &'static str {
    match compression_code as u16 {
        compression::NONE => "None",
        compression::LZW => "LZW",
        compression::JPEG => "JPEG",
        compression::DEFLATE | compression::DEFLATE_OBSOLETE => "Adobe Deflate",
        compression::ZSTD => "Zstandard",
        compression::PACKBITS => "PackBits",
        _ => "Unknown",
    }
}
