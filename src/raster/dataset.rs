//! Read-only access to GeoTIFF rasters
//!
//! `RasterDataset::open` parses the directory and georeferencing up front
//! and keeps only the path; band reads reopen the file.

use log::{debug, info};
use ndarray::Array2;

use crate::errors::{RasterError, RasterResult};
use crate::raster::array::PixelArray;
use crate::raster::band_reader::BandLayout;
use crate::raster::driver::GTIFF_DRIVER;
use crate::raster::geo_transform::GeoTransform;
use crate::raster::pixel::{PixelType, RasterElement};
use crate::tiff::builders::metadata_tags::MetadataBuilder;
use crate::tiff::constants::tags;
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::reader::TiffReader;

/// An opened raster file
///
/// Band indices are 1-based, as in GDAL.
pub struct RasterDataset {
    path: String,
    reader: TiffReader,
    layout: BandLayout,
    geo_transform: Option<GeoTransform>,
    projection: Option<String>,
    nodata: Option<f64>,
}

impl RasterDataset {
    /// Open a raster read-only
    ///
    /// Any failure to read or parse the file is reported as
    /// `ResourceNotFound`.
    pub fn open(path: &str) -> RasterResult<Self> {
        Self::load(path).map_err(|e| match e {
            e @ RasterError::ResourceNotFound { .. } => e,
            other => RasterError::not_found(path, other),
        })
    }

    fn load(path: &str) -> RasterResult<Self> {
        let mut reader = TiffReader::new();
        let tiff = reader.load(path)?;
        let ifd = tiff.main_ifd()
            .ok_or_else(|| RasterError::GenericError("File contains no image directory".to_string()))?;

        let mut stream = reader.create_reader()?;
        let layout = BandLayout::from_ifd(&reader, &mut stream, ifd)?;
        let geo_transform = GeoKeyParser::read_geo_transform(&reader, &mut stream, ifd)?;
        let projection = GeoKeyParser::read_projection(&reader, &mut stream, ifd)?;
        let nodata = if ifd.has_tag(tags::GDAL_NODATA) {
            let text = reader.read_tag_ascii(&mut stream, ifd, tags::GDAL_NODATA)?;
            MetadataBuilder::parse_nodata(&text)
        } else {
            None
        };

        info!("Opened {} ({}x{}, {} bands, {})",
              path, layout.columns, layout.rows, layout.samples_per_pixel, layout.pixel_type);
        debug!("Georeferencing: transform {:?}, projection {:?}, nodata {:?}",
               geo_transform, projection, nodata);

        Ok(RasterDataset {
            path: path.to_string(),
            reader,
            layout,
            geo_transform,
            projection,
            nodata,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `(columns, rows)`
    pub fn raster_size(&self) -> (usize, usize) {
        (self.layout.columns, self.layout.rows)
    }

    pub fn raster_count(&self) -> usize {
        self.layout.samples_per_pixel
    }

    pub fn pixel_type(&self) -> PixelType {
        self.layout.pixel_type
    }

    pub fn driver_name(&self) -> &'static str {
        GTIFF_DRIVER
    }

    /// Affine transform, `None` for rasters without georeferencing
    pub fn geo_transform(&self) -> Option<GeoTransform> {
        self.geo_transform
    }

    /// Projection descriptor, empty when the raster has none
    pub fn projection(&self) -> String {
        self.projection.clone().unwrap_or_default()
    }

    /// NoData value of a band
    pub fn band_nodata(&self, index: usize) -> RasterResult<Option<f64>> {
        self.check_band(index)?;
        Ok(self.nodata)
    }

    /// Read one band converted to `T`
    pub fn read_band<T: RasterElement>(&self, index: usize) -> RasterResult<Array2<T>> {
        self.check_band(index)?;
        let order = self.reader.get_byte_order_handler()
            .map(|handler| handler.byte_order())
            .ok_or_else(|| RasterError::GenericError("Byte order not yet determined".to_string()))?;

        let mut stream = self.reader.create_reader()?;
        let samples = self.layout.read_band(&self.reader, &mut stream, index - 1, order)?;
        let values = samples.into_iter().map(T::from_f64).collect();

        Array2::from_shape_vec((self.layout.rows, self.layout.columns), values)
            .map_err(|e| RasterError::GenericError(format!("band {}: {}", index, e)))
    }

    /// Read every band into a `rows x columns x bands` buffer
    pub fn read_array<T: RasterElement>(&self) -> RasterResult<PixelArray<T>> {
        let bands = (1..=self.raster_count())
            .map(|index| self.read_band::<T>(index))
            .collect::<RasterResult<Vec<_>>>()?;
        PixelArray::from_bands(&bands)
    }

    fn check_band(&self, index: usize) -> RasterResult<()> {
        if index == 0 || index > self.raster_count() {
            return Err(RasterError::InvalidArgument(format!(
                "band {} out of range 1..={}", index, self.raster_count())));
        }
        Ok(())
    }
}
