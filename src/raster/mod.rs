//! Raster model: pixel types, arrays, georeferencing, datasets and drivers

pub mod array;
pub(crate) mod band_reader;
pub mod dataset;
pub mod driver;
pub mod geo_transform;
pub mod options;
pub mod pixel;

pub use array::PixelArray;
pub use dataset::RasterDataset;
pub use driver::{DriverManager, GeoTiffDriver, RasterDriver, WritableRaster, GTIFF_DRIVER};
pub use geo_transform::{BoundingBox, GeoTransform};
pub use options::{RasterMetadata, RasterOptions};
pub use pixel::{PixelType, RasterElement};
