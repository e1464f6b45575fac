//! Byte order handling for TIFF files
//!
//! Readers accept both little-endian (II) and big-endian (MM) files through
//! a handler chosen once from the header. The writer always emits
//! little-endian.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::errors::{RasterError, RasterResult};
use crate::io::seekable::SeekableReader;

/// Byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> RasterResult<Self> {
        let byte_order = reader.read_u16::<LittleEndian>()?;
        match byte_order {
            0x4949 => Ok(ByteOrder::LittleEndian), // "II"
            0x4D4D => Ok(ByteOrder::BigEndian),    // "MM"
            _ => Err(RasterError::InvalidByteOrder(byte_order)),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Byte order strategy used by the reader
pub trait ByteOrderHandler: Send + Sync {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;
    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16>;
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32>;
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;
    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Recover the raw bytes of an inline IFD value field
    ///
    /// The value field is read as an unsigned integer of the offset width
    /// (4 bytes classic, 8 bytes BigTIFF). Inline payloads are left-justified
    /// in that field, so the original byte sequence depends on the order it
    /// was decoded with.
    fn inline_bytes(&self, value: u64, is_big_tiff: bool) -> Vec<u8>;

    /// Which byte order this handler implements
    fn byte_order(&self) -> ByteOrder;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
        reader.read_i16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }

    fn inline_bytes(&self, value: u64, is_big_tiff: bool) -> Vec<u8> {
        if is_big_tiff {
            value.to_le_bytes().to_vec()
        } else {
            (value as u32).to_le_bytes().to_vec()
        }
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
        reader.read_i16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }

    fn inline_bytes(&self, value: u64, is_big_tiff: bool) -> Vec<u8> {
        if is_big_tiff {
            value.to_be_bytes().to_vec()
        } else {
            (value as u32).to_be_bytes().to_vec()
        }
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }
}
