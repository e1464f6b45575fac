//! Burning vector attributes into raster masks
//!
//! Geometry rasterisation is delegated to an external tool hidden behind
//! the `VectorRasterizer` trait; `GdalRasterize` drives `gdal_rasterize`.

mod gdal_cli;
mod params;
mod pipeline;

pub use gdal_cli::{GdalRasterize, GDAL_RASTERIZE};
pub use params::{params_from_template, RasterizeParams};
pub use pipeline::MaskPipeline;

use crate::errors::RasterResult;

/// Something that can burn a vector layer into a raster
pub trait VectorRasterizer {
    /// Produce `params.output_raster`, failing if no output was written
    fn run(&self, params: &RasterizeParams) -> RasterResult<()>;
}

impl<R: VectorRasterizer + ?Sized> VectorRasterizer for &R {
    fn run(&self, params: &RasterizeParams) -> RasterResult<()> {
        (**self).run(params)
    }
}

impl<R: VectorRasterizer + ?Sized> VectorRasterizer for Box<R> {
    fn run(&self, params: &RasterizeParams) -> RasterResult<()> {
        (**self).run(params)
    }
}
