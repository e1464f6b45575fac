//! Affine georeferencing and bounding boxes

use std::fmt;
use std::str::FromStr;

use crate::errors::{RasterError, RasterResult};

/// Affine transform between pixel/line space and map coordinates
///
/// Coefficients follow GDAL's ordering:
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up rasters both rotations are zero and `pixel_height` is
/// negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner of the upper-left pixel
    pub origin_x: f64,
    /// W-E pixel size
    pub pixel_width: f64,
    /// Row rotation, usually zero
    pub row_rotation: f64,
    /// Y coordinate of the upper-left corner of the upper-left pixel
    pub origin_y: f64,
    /// Column rotation, usually zero
    pub col_rotation: f64,
    /// N-S pixel size, negative for north-up
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform with the given origin and pixel sizes
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    /// Build from GDAL's `[c, a, b, f, d, e]` array
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        GeoTransform {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// GDAL-ordered coefficient array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Map a pixel/line position (corner convention) to world coordinates
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// True when neither rotation term is set
    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0
    }

    /// Horizontal resolution
    pub fn x_resolution(&self) -> f64 {
        self.pixel_width
    }

    /// Vertical resolution, always positive
    pub fn y_resolution(&self) -> f64 {
        self.pixel_height.abs()
    }

    /// Rejects transforms that cannot describe a raster grid
    pub fn validate(&self) -> RasterResult<()> {
        if !(self.pixel_width > 0.0) {
            return Err(RasterError::InvalidArgument(format!(
                "pixel width must be positive, got {}", self.pixel_width)));
        }
        if self.pixel_height == 0.0 || self.pixel_height.is_nan() {
            return Err(RasterError::InvalidArgument(
                "pixel height must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.to_gdal();
        write!(f, "[{}, {}, {}, {}, {}, {}]", c[0], c[1], c[2], c[3], c[4], c[5])
    }
}

/// Axis-aligned rectangle in map coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting empty or inverted extents
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> RasterResult<Self> {
        if !(xmax > xmin) || !(ymax > ymin) {
            return Err(RasterError::InvalidArgument(format!(
                "bounding box must satisfy xmin < xmax and ymin < ymax, got {},{},{},{}",
                xmin, ymin, xmax, ymax)));
        }
        Ok(BoundingBox { xmin, ymin, xmax, ymax })
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

impl FromStr for BoundingBox {
    type Err = RasterError;

    /// Parses `xmin,ymin,xmax,ymax`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 4 {
            return Err(RasterError::InvalidArgument(format!(
                "bounding box needs 4 comma-separated values, got '{}'", s)));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse::<f64>().map_err(|e| RasterError::InvalidArgument(
                format!("invalid bounding box value '{}': {}", part, e)))?;
        }

        BoundingBox::new(values[0], values[1], values[2], values[3])
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}
