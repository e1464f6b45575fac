//! Writing pixel arrays as georeferenced rasters

use log::{debug, info};
use ndarray::Array2;

use crate::errors::RasterResult;
use crate::raster::array::PixelArray;
use crate::raster::driver::{DriverManager, WritableRaster};
use crate::raster::options::RasterOptions;
use crate::raster::pixel::RasterElement;
use crate::utils::progress::ProgressTracker;

/// Materialises arrays as raster files, one band per array channel
#[derive(Debug, Clone, Default)]
pub struct RasterWriter {
    show_progress: bool,
}

impl RasterWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar while bands are written
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Write `array` to `path`
    ///
    /// Properties missing from `options` are read from its template. When
    /// `nodata` is given it is recorded for every band. A failure after the
    /// file was created leaves the partial file on disk.
    pub fn write<T: RasterElement>(
        &self,
        path: &str,
        array: &PixelArray<T>,
        options: &RasterOptions,
        nodata: Option<f64>,
    ) -> RasterResult<()> {
        let metadata = options.resolve(array, nodata)?;
        let driver = DriverManager::get_driver_by_name(&metadata.driver_name)?;

        info!("Writing {} ({}x{}, {} bands, {}) with {}",
              path, metadata.columns, metadata.rows, metadata.band_count,
              metadata.pixel_type, driver.short_name());

        let mut raster = driver.create(
            path,
            metadata.columns,
            metadata.rows,
            metadata.band_count,
            metadata.pixel_type,
            &options.creation_options,
        )?;
        raster.set_geo_transform(&metadata.geo_transform)?;
        raster.set_projection(&metadata.projection)?;

        let progress = if self.show_progress {
            ProgressTracker::new(metadata.band_count as u64, path)
        } else {
            ProgressTracker::hidden()
        };

        for band in 0..metadata.band_count {
            let index = band + 1;
            let data = array.band_as_f64(band)?;

            if let Err(e) = Self::write_band(raster.as_mut(), index, &data, metadata.nodata) {
                progress.abandon();
                return Err(e);
            }

            debug!("Band {} of {} written", index, metadata.band_count);
            progress.increment(1);
        }

        raster.close()?;
        progress.finish();
        info!("Wrote {}", path);
        Ok(())
    }

    fn write_band(raster: &mut dyn WritableRaster, index: usize, data: &Array2<f64>, nodata: Option<f64>) -> RasterResult<()> {
        raster.write_band(index, data)?;
        if let Some(value) = nodata {
            raster.set_band_nodata(index, value)?;
        }
        raster.flush_band(index)
    }
}
