//! Raster drivers
//!
//! A driver creates writable rasters of one file format. Drivers are looked
//! up by their GDAL short name through `DriverManager`.

use log::{debug, info, warn};
use ndarray::Array2;

use crate::compression::{CompressionFactory, CompressionHandler, ZstdHandler};
use crate::errors::{RasterError, RasterResult};
use crate::raster::geo_transform::GeoTransform;
use crate::raster::options::creation_option;
use crate::raster::pixel::PixelType;
use crate::tiff::builder::TiffBuilder;

/// Short name of the GeoTIFF driver
pub const GTIFF_DRIVER: &str = "GTiff";

/// Creation option keys understood by the GeoTIFF driver
const GTIFF_OPTIONS: [&str; 2] = ["COMPRESS", "ZSTD_LEVEL"];

/// A raster file format that can create new datasets
pub trait RasterDriver {
    fn short_name(&self) -> &'static str;

    /// Create a new raster on disk
    fn create(
        &self,
        path: &str,
        columns: usize,
        rows: usize,
        bands: usize,
        pixel_type: PixelType,
        creation_options: &[String],
    ) -> RasterResult<Box<dyn WritableRaster>>;
}

/// A raster being written
///
/// Band indices are 1-based.
pub trait WritableRaster {
    fn set_geo_transform(&mut self, geo_transform: &GeoTransform) -> RasterResult<()>;

    fn set_projection(&mut self, projection: &str) -> RasterResult<()>;

    /// Store one band, converting samples to the raster's pixel type
    fn write_band(&mut self, index: usize, data: &Array2<f64>) -> RasterResult<()>;

    fn set_band_nodata(&mut self, index: usize, nodata: f64) -> RasterResult<()>;

    /// Push a written band to storage
    fn flush_band(&mut self, index: usize) -> RasterResult<()>;

    /// Finish the file
    fn close(self: Box<Self>) -> RasterResult<()>;
}

/// Registry of the available drivers
pub struct DriverManager;

impl DriverManager {
    /// Look up a driver by short name, ignoring case
    pub fn get_driver_by_name(name: &str) -> RasterResult<Box<dyn RasterDriver>> {
        if name.eq_ignore_ascii_case(GTIFF_DRIVER) {
            return Ok(Box::new(GeoTiffDriver));
        }
        Err(RasterError::UnknownDriver(name.to_string()))
    }
}

/// Driver writing planar-separate GeoTIFFs
pub struct GeoTiffDriver;

impl GeoTiffDriver {
    fn compression_from_options(options: &[String]) -> RasterResult<Box<dyn CompressionHandler>> {
        for option in options {
            let key = option.split_once('=').map(|(k, _)| k.trim()).unwrap_or(option.as_str());
            if !GTIFF_OPTIONS.iter().any(|known| known.eq_ignore_ascii_case(key)) {
                warn!("Ignoring unsupported creation option '{}'", option);
            }
        }

        let name = creation_option(options, "COMPRESS").unwrap_or("NONE");
        let handler = CompressionFactory::get_handler_by_name(name)?;

        if handler.name() == "ZSTD" {
            if let Some(level) = creation_option(options, "ZSTD_LEVEL") {
                let level: i32 = level.parse().map_err(|_| RasterError::InvalidArgument(
                    format!("ZSTD_LEVEL must be an integer, got '{}'", level)))?;
                return Ok(Box::new(ZstdHandler::with_level(level)));
            }
        }
        Ok(handler)
    }
}

impl RasterDriver for GeoTiffDriver {
    fn short_name(&self) -> &'static str {
        GTIFF_DRIVER
    }

    fn create(
        &self,
        path: &str,
        columns: usize,
        rows: usize,
        bands: usize,
        pixel_type: PixelType,
        creation_options: &[String],
    ) -> RasterResult<Box<dyn WritableRaster>> {
        let compression = Self::compression_from_options(creation_options)?;
        info!("Creating {} raster {} ({}x{}, {} bands, {}, {})",
              GTIFF_DRIVER, path, columns, rows, bands, pixel_type, compression.name());

        let builder = TiffBuilder::create(path, columns, rows, bands, pixel_type, compression)?;
        Ok(Box::new(GeoTiffDataset {
            builder,
            columns,
            rows,
            nodata: None,
        }))
    }
}

/// GeoTIFF under construction
struct GeoTiffDataset {
    builder: TiffBuilder,
    columns: usize,
    rows: usize,
    nodata: Option<f64>,
}

impl GeoTiffDataset {
    fn band_index(&self, index: usize) -> RasterResult<usize> {
        if index == 0 || index > self.builder.band_count() {
            return Err(RasterError::InvalidArgument(format!(
                "band {} out of range 1..={}", index, self.builder.band_count())));
        }
        Ok(index - 1)
    }
}

impl WritableRaster for GeoTiffDataset {
    fn set_geo_transform(&mut self, geo_transform: &GeoTransform) -> RasterResult<()> {
        geo_transform.validate()?;
        self.builder.set_geo_transform(geo_transform);
        Ok(())
    }

    fn set_projection(&mut self, projection: &str) -> RasterResult<()> {
        self.builder.set_projection(projection);
        Ok(())
    }

    fn write_band(&mut self, index: usize, data: &Array2<f64>) -> RasterResult<()> {
        let band = self.band_index(index)?;
        if data.dim() != (self.rows, self.columns) {
            return Err(RasterError::InvalidArgument(format!(
                "band {} is {:?}, raster is {}x{}", index, data.dim(), self.rows, self.columns)));
        }

        let samples = self.builder.pixel_type().encode_samples(data.iter().copied());
        self.builder.write_band(band, &samples)
    }

    fn set_band_nodata(&mut self, index: usize, nodata: f64) -> RasterResult<()> {
        self.band_index(index)?;
        match self.nodata {
            Some(current) if !same_nodata(current, nodata) => {
                Err(RasterError::InvalidArgument(format!(
                    "GeoTIFF stores one NoData value per file: band {} asks for {}, already {}",
                    index, nodata, current)))
            }
            Some(_) => Ok(()),
            None => {
                debug!("NoData set to {}", nodata);
                self.nodata = Some(nodata);
                self.builder.set_nodata(nodata);
                Ok(())
            }
        }
    }

    fn flush_band(&mut self, index: usize) -> RasterResult<()> {
        self.band_index(index)?;
        self.builder.flush()
    }

    fn close(self: Box<Self>) -> RasterResult<()> {
        self.builder.finish()
    }
}

fn same_nodata(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drivers_are_found_by_short_name() {
        assert_eq!(DriverManager::get_driver_by_name("GTiff").unwrap().short_name(), "GTiff");
        assert_eq!(DriverManager::get_driver_by_name("gtiff").unwrap().short_name(), "GTiff");
        assert!(matches!(DriverManager::get_driver_by_name("HFA"),
                         Err(RasterError::UnknownDriver(name)) if name == "HFA"));
    }

    #[test]
    fn compression_options() {
        let none = GeoTiffDriver::compression_from_options(&[]).unwrap();
        assert_eq!(none.name(), "NONE");

        let options = vec!["compress=zstd".to_string(), "ZSTD_LEVEL=9".to_string(), "TILED=YES".to_string()];
        assert_eq!(GeoTiffDriver::compression_from_options(&options).unwrap().name(), "ZSTD");

        let bad = vec!["COMPRESS=JPEG".to_string()];
        assert!(GeoTiffDriver::compression_from_options(&bad).is_err());
    }

    #[test]
    fn differing_nodata_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodata.tif").to_string_lossy().into_owned();

        let driver = DriverManager::get_driver_by_name(GTIFF_DRIVER).unwrap();
        let mut raster = driver.create(&path, 2, 2, 2, PixelType::Byte, &[]).unwrap();
        raster.set_band_nodata(1, 0.0).unwrap();
        raster.set_band_nodata(2, 0.0).unwrap();
        assert!(matches!(raster.set_band_nodata(2, 255.0), Err(RasterError::InvalidArgument(_))));
        assert!(raster.set_band_nodata(3, 0.0).is_err());
        assert!(raster.write_band(1, &Array2::zeros((3, 2))).is_err());
        raster.close().unwrap();
    }
}
