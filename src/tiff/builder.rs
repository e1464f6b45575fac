//! GeoTIFF file construction
//!
//! `TiffBuilder` collects the tags of a single-image GeoTIFF while its band
//! strips are streamed to disk, then writes the directory on `finish`.

use log::{debug, info, warn};

use crate::compression::CompressionHandler;
use crate::errors::{RasterError, RasterResult};
use crate::raster::geo_transform::GeoTransform;
use crate::raster::pixel::PixelType;
use crate::tiff::ifd::IFD;
use crate::utils::tiff_utils::ExternalData;

use crate::tiff::builders::basic_tags::BasicTagsBuilder;
use crate::tiff::builders::geo_tags::GeoTagsBuilder;
use crate::tiff::builders::metadata_tags::MetadataBuilder;
use crate::tiff::builders::writer::TiffStreamWriter;

/// Builder for a planar-separate GeoTIFF
pub struct TiffBuilder {
    ifd: IFD,
    external_data: ExternalData,
    writer: TiffStreamWriter,
    compression: Box<dyn CompressionHandler>,
    columns: u32,
    rows: u32,
    pixel_type: PixelType,
    /// (offset, byte count) of each band strip once written
    strips: Vec<Option<(u32, u32)>>,
}

impl TiffBuilder {
    /// Create the output file and lay out the image structure tags
    pub fn create(
        output_path: &str,
        columns: usize,
        rows: usize,
        bands: usize,
        pixel_type: PixelType,
        compression: Box<dyn CompressionHandler>,
    ) -> RasterResult<Self> {
        if columns == 0 || rows == 0 || bands == 0 {
            return Err(RasterError::InvalidArgument(format!(
                "raster dimensions must be non-zero, got {}x{}x{}", columns, rows, bands)));
        }
        let columns = u32::try_from(columns)
            .map_err(|_| RasterError::InvalidArgument(format!("too many columns: {}", columns)))?;
        let rows = u32::try_from(rows)
            .map_err(|_| RasterError::InvalidArgument(format!("too many rows: {}", rows)))?;
        let band_count = u16::try_from(bands)
            .map_err(|_| RasterError::InvalidArgument(format!("too many bands: {}", bands)))?;

        info!("Creating TiffBuilder for {} ({}x{}x{} {}, {})",
              output_path, columns, rows, bands, pixel_type, compression.name());

        let writer = TiffStreamWriter::create(output_path)?;

        let mut ifd = IFD::new(0, 0);
        let mut external_data = ExternalData::new();
        BasicTagsBuilder::add_band_layout_tags(&mut ifd, &mut external_data, columns, rows,
                                               band_count, pixel_type, compression.code());
        MetadataBuilder::add_software_tag(&mut ifd, &mut external_data,
                                          concat!("rastermask ", env!("CARGO_PKG_VERSION")));

        Ok(TiffBuilder {
            ifd,
            external_data,
            writer,
            compression,
            columns,
            rows,
            pixel_type,
            strips: vec![None; bands],
        })
    }

    pub fn band_count(&self) -> usize {
        self.strips.len()
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Samples expected in one band
    pub fn band_len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Set the affine transform
    pub fn set_geo_transform(&mut self, geo_transform: &GeoTransform) {
        GeoTagsBuilder::add_geo_transform(&mut self.ifd, &mut self.external_data, geo_transform);
    }

    /// Set the projection descriptor
    pub fn set_projection(&mut self, projection: &str) {
        GeoTagsBuilder::add_projection(&mut self.ifd, &mut self.external_data, projection);
    }

    /// Set the file-wide NoData value
    pub fn set_nodata(&mut self, nodata: f64) {
        MetadataBuilder::add_nodata_tag(&mut self.ifd, &mut self.external_data, nodata);
    }

    /// Compress and append one band's samples
    ///
    /// `samples` must already be encoded in the builder's pixel type.
    pub fn write_band(&mut self, index: usize, samples: &[u8]) -> RasterResult<()> {
        let expected = self.band_len() * self.pixel_type.size_bytes();
        if samples.len() != expected {
            return Err(RasterError::InvalidArgument(format!(
                "band {} has {} bytes, expected {}", index + 1, samples.len(), expected)));
        }
        match self.strips.get(index) {
            None => return Err(RasterError::InvalidArgument(format!(
                "band {} out of range for {} bands", index + 1, self.strips.len()))),
            Some(Some(_)) => warn!("Band {} written twice, keeping the last strip", index + 1),
            Some(None) => {}
        }

        let strip = self.compression.compress(samples)?;
        let offset = self.writer.append(&strip)?;
        debug!("Band {} strip: {} bytes at {}", index + 1, strip.len(), offset);

        self.strips[index] = Some((offset, strip.len() as u32));
        Ok(())
    }

    /// Push written strips to the file
    pub fn flush(&mut self) -> RasterResult<()> {
        self.writer.flush()
    }

    /// Write the directory and close the file
    ///
    /// Bands that were never written are filled with zeros.
    pub fn finish(mut self) -> RasterResult<()> {
        for index in 0..self.strips.len() {
            if self.strips[index].is_none() {
                warn!("Band {} was never written, filling with zeros", index + 1);
                let zeros = vec![0u8; self.band_len() * self.pixel_type.size_bytes()];
                self.write_band(index, &zeros)?;
            }
        }

        let (offsets, byte_counts): (Vec<u32>, Vec<u32>) = self.strips.iter()
            .flatten()
            .copied()
            .unzip();
        BasicTagsBuilder::set_strip_layout(&mut self.ifd, &mut self.external_data, &offsets, &byte_counts);

        info!("Writing TIFF directory to {}", self.writer.path());
        self.writer.finish(&self.ifd, &self.external_data)
    }
}
