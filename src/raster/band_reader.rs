//! Band decoding for stripped and tiled TIFFs
//!
//! Strips and tiles are both treated as rectangular chunks of the image.
//! With PlanarConfiguration 2 every band owns its own run of chunks; with
//! interleaved samples each chunk carries all bands and one sample per
//! pixel is picked out.

use byteorder::{BigEndian, LittleEndian};
use log::{debug, trace};

use crate::compression::CompressionFactory;
use crate::errors::{RasterError, RasterResult};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::raster::pixel::PixelType;
use crate::tiff::constants::{planar_config, predictor, tags};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Storage layout of the image data of one IFD
#[derive(Debug, Clone)]
pub struct BandLayout {
    pub columns: usize,
    pub rows: usize,
    pub samples_per_pixel: usize,
    pub pixel_type: PixelType,
    planar: u16,
    compression: u64,
    predictor: u16,
    /// Chunk width and height: a full-width strip or a tile
    chunk_width: usize,
    chunk_height: usize,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
}

/// Reads one tag value, defaulting when the tag is absent
fn tag_or(reader: &TiffReader, stream: &mut dyn SeekableReader, ifd: &IFD, tag: u16, default: u64) -> RasterResult<u64> {
    if !ifd.has_tag(tag) {
        return Ok(default);
    }
    reader.read_tag_values(stream, ifd, tag)?
        .first()
        .copied()
        .ok_or(RasterError::TagNotFound(tag))
}

impl BandLayout {
    /// Collect the layout tags of an IFD
    pub fn from_ifd(reader: &TiffReader, stream: &mut dyn SeekableReader, ifd: &IFD) -> RasterResult<Self> {
        if !ifd.has_tag(tags::IMAGE_WIDTH) || !ifd.has_tag(tags::IMAGE_LENGTH) {
            return Err(RasterError::MissingDimensions);
        }
        let columns = tag_or(reader, stream, ifd, tags::IMAGE_WIDTH, 0)? as usize;
        let rows = tag_or(reader, stream, ifd, tags::IMAGE_LENGTH, 0)? as usize;
        let samples_per_pixel = tag_or(reader, stream, ifd, tags::SAMPLES_PER_PIXEL, 1)?.max(1) as usize;

        let bits = tag_or(reader, stream, ifd, tags::BITS_PER_SAMPLE, 1)? as u16;
        let format = tag_or(reader, stream, ifd, tags::SAMPLE_FORMAT, 1)? as u16;
        let pixel_type = PixelType::from_tiff(format, bits)?;

        let planar = tag_or(reader, stream, ifd, tags::PLANAR_CONFIGURATION, planar_config::CHUNKY as u64)? as u16;
        let compression = tag_or(reader, stream, ifd, tags::COMPRESSION, 1)?;
        let predictor = tag_or(reader, stream, ifd, tags::PREDICTOR, predictor::NONE as u64)? as u16;

        let (chunk_width, chunk_height, offsets, byte_counts) = if ifd.has_tag(tags::TILE_OFFSETS) {
            let tile_width = tag_or(reader, stream, ifd, tags::TILE_WIDTH, 256)? as usize;
            let tile_height = tag_or(reader, stream, ifd, tags::TILE_LENGTH, 256)? as usize;
            (
                tile_width,
                tile_height,
                reader.read_tag_values(stream, ifd, tags::TILE_OFFSETS)?,
                reader.read_tag_values(stream, ifd, tags::TILE_BYTE_COUNTS)?,
            )
        } else {
            let rows_per_strip = tag_or(reader, stream, ifd, tags::ROWS_PER_STRIP, rows as u64)?
                .min(rows as u64) as usize;
            (
                columns,
                rows_per_strip,
                reader.read_tag_values(stream, ifd, tags::STRIP_OFFSETS)?,
                reader.read_tag_values(stream, ifd, tags::STRIP_BYTE_COUNTS)?,
            )
        };

        if chunk_width == 0 || chunk_height == 0 {
            return Err(RasterError::GenericError("Zero-sized strips or tiles".to_string()));
        }
        if offsets.len() != byte_counts.len() {
            return Err(RasterError::GenericError(format!(
                "{} chunk offsets but {} byte counts", offsets.len(), byte_counts.len())));
        }

        Ok(BandLayout {
            columns,
            rows,
            samples_per_pixel,
            pixel_type,
            planar,
            compression,
            predictor,
            chunk_width,
            chunk_height,
            offsets,
            byte_counts,
        })
    }

    fn chunks_across(&self) -> usize {
        (self.columns + self.chunk_width - 1) / self.chunk_width
    }

    fn chunks_per_plane(&self) -> usize {
        self.chunks_across() * ((self.rows + self.chunk_height - 1) / self.chunk_height)
    }

    fn is_planar(&self) -> bool {
        self.planar == planar_config::PLANAR
    }

    /// Decode one band (0-based) into row-major f64 samples
    pub fn read_band(&self, reader: &TiffReader, stream: &mut dyn SeekableReader, band: usize, order: ByteOrder) -> RasterResult<Vec<f64>> {
        if band >= self.samples_per_pixel {
            return Err(RasterError::InvalidArgument(format!(
                "band {} out of range for {} bands", band + 1, self.samples_per_pixel)));
        }

        let handler = CompressionFactory::create_handler(self.compression)?;
        let per_plane = self.chunks_per_plane();
        let (first_chunk, stride, sample) = if self.is_planar() {
            (band * per_plane, 1, 0)
        } else {
            (0, self.samples_per_pixel, band)
        };

        if first_chunk + per_plane > self.offsets.len() {
            return Err(RasterError::GenericError(format!(
                "Expected {} chunks for band {}, file lists {}",
                first_chunk + per_plane, band + 1, self.offsets.len())));
        }

        debug!("Reading band {} from {} chunks ({}x{}, {})",
               band + 1, per_plane, self.chunk_width, self.chunk_height, handler.name());

        let mut out = vec![0.0f64; self.columns * self.rows];
        let across = self.chunks_across();

        for i in 0..per_plane {
            let chunk = first_chunk + i;
            let compressed = reader.read_bytes_at(stream, self.offsets[chunk], self.byte_counts[chunk])?;
            let mut raw = handler.decompress(&compressed)?;
            trace!("Chunk {}: {} -> {} bytes", chunk, compressed.len(), raw.len());

            let row_len = self.chunk_width * stride;
            match self.predictor {
                predictor::NONE => {}
                predictor::HORIZONTAL_DIFFERENCING => {
                    undo_horizontal_predictor(&mut raw, row_len, stride, self.pixel_type, order)?
                }
                other => return Err(RasterError::GenericError(format!("Unsupported predictor: {}", other))),
            }

            let samples = self.pixel_type.decode_samples(&raw, order);
            let x0 = (i % across) * self.chunk_width;
            let y0 = (i / across) * self.chunk_height;

            for r in 0..self.chunk_height {
                let y = y0 + r;
                if y >= self.rows {
                    break;
                }
                for c in 0..self.chunk_width {
                    let x = x0 + c;
                    if x >= self.columns {
                        break;
                    }
                    if let Some(&value) = samples.get(r * row_len + c * stride + sample) {
                        out[y * self.columns + x] = value;
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Reverse TIFF horizontal differencing in place
///
/// Each sample holds the difference to the sample `stride` positions to its
/// left within the same row; integer types only.
fn undo_horizontal_predictor(data: &mut [u8], row_len: usize, stride: usize, pixel_type: PixelType, order: ByteOrder) -> RasterResult<()> {
    match (pixel_type, order) {
        (PixelType::Byte, _) => accumulate(data, row_len, stride, 1, |b| b[0] as u64, |b, v| b[0] = v as u8),
        (PixelType::UInt16 | PixelType::Int16, ByteOrder::LittleEndian) => accumulate_with::<LittleEndian>(data, row_len, stride, 2),
        (PixelType::UInt16 | PixelType::Int16, ByteOrder::BigEndian) => accumulate_with::<BigEndian>(data, row_len, stride, 2),
        (PixelType::UInt32 | PixelType::Int32, ByteOrder::LittleEndian) => accumulate_with::<LittleEndian>(data, row_len, stride, 4),
        (PixelType::UInt32 | PixelType::Int32, ByteOrder::BigEndian) => accumulate_with::<BigEndian>(data, row_len, stride, 4),
        (other, _) => return Err(RasterError::GenericError(format!(
            "Horizontal predictor is not defined for {} samples", other))),
    }
    Ok(())
}

fn accumulate_with<B: byteorder::ByteOrder>(data: &mut [u8], row_len: usize, stride: usize, size: usize) {
    if size == 2 {
        accumulate(data, row_len, stride, 2, |b| B::read_u16(b) as u64, |b, v| B::write_u16(b, v as u16));
    } else {
        accumulate(data, row_len, stride, 4, |b| B::read_u32(b) as u64, |b, v| B::write_u32(b, v as u32));
    }
}

fn accumulate(
    data: &mut [u8],
    row_len: usize,
    stride: usize,
    size: usize,
    read: impl Fn(&[u8]) -> u64,
    write: impl Fn(&mut [u8], u64),
) {
    let row_bytes = row_len * size;
    if row_bytes == 0 {
        return;
    }
    for row in data.chunks_exact_mut(row_bytes) {
        for i in stride..row_len {
            let previous = read(&row[(i - stride) * size..(i - stride + 1) * size]);
            let current = read(&row[i * size..(i + 1) * size]);
            write(&mut row[i * size..(i + 1) * size], current.wrapping_add(previous));
        }
    }
}
