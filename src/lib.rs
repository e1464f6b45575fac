//! Raster masks aligned to template rasters
//!
//! - [`ExtentResolver`] reads resolution, size and bounds from a template.
//! - [`RasterWriter`] writes a pixel array as a georeferenced GeoTIFF.
//! - [`VectorRasterizer`] burns vector attributes into masks, with
//!   [`GdalRasterize`] driving the `gdal_rasterize` tool.

pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod raster;
pub mod extent;
pub mod writer;
pub mod rasterize;
pub mod config;
pub mod commands;
pub mod errors;

pub use errors::{RasterError, RasterResult};
pub use extent::{ExtentResolver, RasterExtent};
pub use writer::RasterWriter;
pub use raster::{BoundingBox, DriverManager, GeoTransform, PixelArray, PixelType, RasterDataset,
                 RasterElement, RasterMetadata, RasterOptions};
pub use rasterize::{params_from_template, GdalRasterize, MaskPipeline, RasterizeParams, VectorRasterizer};
