//! Pixel data types
//!
//! `PixelType` names the on-disk sample type the way GDAL does and maps it
//! to TIFF's BitsPerSample/SampleFormat pair. `RasterElement` ties Rust
//! element types to their native pixel type.

use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, LittleEndian};

use crate::errors::{RasterError, RasterResult};
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::sample_format;

/// Sample type of a raster band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    Byte,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
}

impl PixelType {
    /// GDAL name of the type
    pub fn name(&self) -> &'static str {
        match self {
            PixelType::Byte => "Byte",
            PixelType::UInt16 => "UInt16",
            PixelType::Int16 => "Int16",
            PixelType::UInt32 => "UInt32",
            PixelType::Int32 => "Int32",
            PixelType::Float32 => "Float32",
            PixelType::Float64 => "Float64",
        }
    }

    /// Bytes per sample
    pub fn size_bytes(&self) -> usize {
        match self {
            PixelType::Byte => 1,
            PixelType::UInt16 | PixelType::Int16 => 2,
            PixelType::UInt32 | PixelType::Int32 | PixelType::Float32 => 4,
            PixelType::Float64 => 8,
        }
    }

    /// TIFF BitsPerSample value
    pub fn bits_per_sample(&self) -> u16 {
        (self.size_bytes() * 8) as u16
    }

    /// TIFF SampleFormat value
    pub fn sample_format(&self) -> u16 {
        match self {
            PixelType::Byte | PixelType::UInt16 | PixelType::UInt32 => sample_format::UNSIGNED,
            PixelType::Int16 | PixelType::Int32 => sample_format::SIGNED,
            PixelType::Float32 | PixelType::Float64 => sample_format::IEEEFP,
        }
    }

    /// Pixel type for a TIFF SampleFormat/BitsPerSample pair
    pub fn from_tiff(format: u16, bits: u16) -> RasterResult<Self> {
        match (format, bits) {
            (sample_format::UNSIGNED, 8) => Ok(PixelType::Byte),
            (sample_format::UNSIGNED, 16) => Ok(PixelType::UInt16),
            (sample_format::SIGNED, 16) => Ok(PixelType::Int16),
            (sample_format::UNSIGNED, 32) => Ok(PixelType::UInt32),
            (sample_format::SIGNED, 32) => Ok(PixelType::Int32),
            (sample_format::IEEEFP, 32) => Ok(PixelType::Float32),
            (sample_format::IEEEFP, 64) => Ok(PixelType::Float64),
            _ => Err(RasterError::UnsupportedSampleFormat { format, bits }),
        }
    }

    /// Append one sample, little-endian, converted with saturation
    pub fn encode_sample(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            PixelType::Byte => out.push(value as u8),
            PixelType::UInt16 => out.extend_from_slice(&(value as u16).to_le_bytes()),
            PixelType::Int16 => out.extend_from_slice(&(value as i16).to_le_bytes()),
            PixelType::UInt32 => out.extend_from_slice(&(value as u32).to_le_bytes()),
            PixelType::Int32 => out.extend_from_slice(&(value as i32).to_le_bytes()),
            PixelType::Float32 => out.extend_from_slice(&(value as f32).to_le_bytes()),
            PixelType::Float64 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Encode a run of samples
    pub fn encode_samples<I>(&self, values: I) -> Vec<u8>
    where
        I: ExactSizeIterator<Item = f64>,
    {
        let mut out = Vec::with_capacity(values.len() * self.size_bytes());
        for value in values {
            self.encode_sample(value, &mut out);
        }
        out
    }

    /// Decode a buffer of samples stored in `order`
    ///
    /// Trailing bytes that do not form a whole sample are ignored.
    pub fn decode_samples(&self, bytes: &[u8], order: ByteOrder) -> Vec<f64> {
        let size = self.size_bytes();
        bytes.chunks_exact(size)
            .map(|chunk| match order {
                ByteOrder::LittleEndian => Self::decode_one::<LittleEndian>(*self, chunk),
                ByteOrder::BigEndian => Self::decode_one::<BigEndian>(*self, chunk),
            })
            .collect()
    }

    fn decode_one<B: byteorder::ByteOrder>(pixel_type: PixelType, chunk: &[u8]) -> f64 {
        match pixel_type {
            PixelType::Byte => chunk[0] as f64,
            PixelType::UInt16 => B::read_u16(chunk) as f64,
            PixelType::Int16 => B::read_i16(chunk) as f64,
            PixelType::UInt32 => B::read_u32(chunk) as f64,
            PixelType::Int32 => B::read_i32(chunk) as f64,
            PixelType::Float32 => B::read_f32(chunk) as f64,
            PixelType::Float64 => B::read_f64(chunk),
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelType {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "byte" | "uint8" => Ok(PixelType::Byte),
            "uint16" => Ok(PixelType::UInt16),
            "int16" => Ok(PixelType::Int16),
            "uint32" => Ok(PixelType::UInt32),
            "int32" => Ok(PixelType::Int32),
            "float32" => Ok(PixelType::Float32),
            "float64" => Ok(PixelType::Float64),
            _ => Err(RasterError::InvalidArgument(format!("Unknown pixel type: {}", s))),
        }
    }
}

/// Element types that can be stored in a raster band
///
/// Conversions go through f64, which holds every supported type exactly.
/// Narrowing saturates at the target range and maps NaN to zero.
pub trait RasterElement: Copy + Default + Send + Sync + 'static {
    /// Native pixel type of this element
    const PIXEL_TYPE: PixelType;

    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_raster_element {
    ($($t:ty => $pixel_type:ident),* $(,)?) => {
        $(
            impl RasterElement for $t {
                const PIXEL_TYPE: PixelType = PixelType::$pixel_type;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_raster_element! {
    u8 => Byte,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    f32 => Float32,
    f64 => Float64,
}
