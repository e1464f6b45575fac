//! Template raster extents
//!
//! Derives the resolution, pixel size and bounding box of an existing
//! raster so other rasters can be aligned to it.

use std::fmt;

use log::{info, warn};

use crate::errors::RasterResult;
use crate::raster::dataset::RasterDataset;
use crate::raster::geo_transform::{BoundingBox, GeoTransform};

/// Resolution, size and bounds of a template raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterExtent {
    pub x_res: f64,
    pub y_res: f64,
    pub columns: usize,
    pub rows: usize,
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl RasterExtent {
    /// Extent of a `columns x rows` raster placed by `geo_transform`
    ///
    /// Rotation terms are ignored; the box spans from the origin along the
    /// pixel sizes.
    pub fn from_geo_transform(geo_transform: &GeoTransform, columns: usize, rows: usize) -> Self {
        let x_res = geo_transform.x_resolution();
        let y_res = geo_transform.y_resolution();
        let xmin = geo_transform.origin_x;
        let ymax = geo_transform.origin_y;

        RasterExtent {
            x_res,
            y_res,
            columns,
            rows,
            xmin,
            ymin: ymax - rows as f64 * y_res,
            xmax: xmin + columns as f64 * x_res,
            ymax,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            xmin: self.xmin,
            ymin: self.ymin,
            xmax: self.xmax,
            ymax: self.ymax,
        }
    }

    /// `(x_res, y_res)`
    pub fn resolution(&self) -> (f64, f64) {
        (self.x_res, self.y_res)
    }
}

impl fmt::Display for RasterExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {} x {}", self.columns, self.rows)?;
        writeln!(f, "Resolution: {}, {}", self.x_res, self.y_res)?;
        write!(f, "Bounds: {}", self.bounding_box())
    }
}

/// Reads extents from template rasters
pub struct ExtentResolver;

impl ExtentResolver {
    /// Resolve the extent of the raster at `template_path`
    ///
    /// Fails with `ResourceNotFound` when the path is not a readable raster.
    /// A raster without georeferencing gets GDAL's default transform
    /// `[0, 1, 0, 0, 0, 1]`. A transform with a non-positive pixel width or
    /// a zero pixel height is rejected as `InvalidArgument`.
    pub fn resolve(template_path: &str) -> RasterResult<RasterExtent> {
        let dataset = RasterDataset::open(template_path)?;
        let (columns, rows) = dataset.raster_size();

        let geo_transform = dataset.geo_transform().unwrap_or_else(|| {
            warn!("{} has no georeferencing, using the identity transform", template_path);
            GeoTransform::from_gdal([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
        });
        drop(dataset);
        geo_transform.validate()?;

        let extent = RasterExtent::from_geo_transform(&geo_transform, columns, rows);
        info!("Extent of {}: {}x{} at {}x{}, bounds {}",
              template_path, columns, rows, extent.x_res, extent.y_res, extent.bounding_box());
        Ok(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::UncompressedHandler;
    use crate::errors::RasterError;
    use crate::raster::pixel::PixelType;
    use crate::tiff::builder::TiffBuilder;

    #[test]
    fn extent_from_north_up_transform() {
        let gt = GeoTransform::north_up(100.0, 500.0, 10.0, -10.0);
        let extent = RasterExtent::from_geo_transform(&gt, 50, 40);

        assert_eq!(extent.resolution(), (10.0, 10.0));
        assert_eq!(extent.bounding_box(), BoundingBox { xmin: 100.0, ymin: 100.0, xmax: 600.0, ymax: 500.0 });
    }

    #[test]
    fn missing_template_is_not_found() {
        let result = ExtentResolver::resolve("/definitely/not/here.tif");
        assert!(matches!(result, Err(RasterError::ResourceNotFound { path, .. }) if path == "/definitely/not/here.tif"));
    }

    #[test]
    fn negative_pixel_width_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrored.tif").to_string_lossy().into_owned();

        let mut builder = TiffBuilder::create(&path, 5, 4, 1, PixelType::Byte, Box::new(UncompressedHandler)).unwrap();
        builder.set_geo_transform(&GeoTransform::from_gdal([600.0, -10.0, 0.0, 200.0, 0.0, -10.0]));
        builder.set_projection("EPSG:32633");
        builder.finish().unwrap();

        assert!(matches!(ExtentResolver::resolve(&path), Err(RasterError::InvalidArgument(_))));
    }

    #[test]
    fn display_lists_bounds() {
        let extent = RasterExtent::from_geo_transform(&GeoTransform::north_up(0.0, 4.0, 2.0, -2.0), 2, 2);
        assert_eq!(extent.to_string(), "Size: 2 x 2\nResolution: 2, 2\nBounds: 0,0,4,4");
    }
}
