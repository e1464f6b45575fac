//! Rasterization parameters

use log::debug;

use crate::errors::{RasterError, RasterResult};
use crate::extent::{ExtentResolver, RasterExtent};
use crate::raster::driver::GTIFF_DRIVER;
use crate::raster::geo_transform::BoundingBox;
use crate::raster::pixel::PixelType;

/// Settings for one rasterization run
///
/// Without a bounding box the tool infers the extent from the vector
/// layer; with one it burns into exactly that box.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeParams {
    pub input_vector: String,
    pub output_raster: String,
    /// Attribute whose value is burned into each pixel
    pub attribute_field: String,
    pub x_res: f64,
    pub y_res: f64,
    pub bounding_box: Option<BoundingBox>,
    /// Snap the output extent to the resolution grid
    pub target_aligned: bool,
    pub pixel_type: PixelType,
    pub output_format: String,
    pub nodata: f64,
}

impl RasterizeParams {
    /// Resolution-only parameters; the extent comes from the vector layer
    pub fn with_resolution(
        input_vector: impl Into<String>,
        output_raster: impl Into<String>,
        attribute_field: impl Into<String>,
        x_res: f64,
        y_res: f64,
    ) -> Self {
        RasterizeParams {
            input_vector: input_vector.into(),
            output_raster: output_raster.into(),
            attribute_field: attribute_field.into(),
            x_res,
            y_res,
            bounding_box: None,
            target_aligned: false,
            pixel_type: PixelType::Byte,
            output_format: GTIFF_DRIVER.to_string(),
            nodata: 0.0,
        }
    }

    /// Parameters matching the grid of an existing raster
    pub fn with_extent(
        input_vector: impl Into<String>,
        output_raster: impl Into<String>,
        attribute_field: impl Into<String>,
        extent: &RasterExtent,
    ) -> Self {
        Self::with_resolution(input_vector, output_raster, attribute_field, extent.x_res, extent.y_res)
            .bounded_by(extent.bounding_box())
            .aligned(true)
    }

    pub fn bounded_by(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn aligned(mut self, target_aligned: bool) -> Self {
        self.target_aligned = target_aligned;
        self
    }

    /// Reject parameters the tool could not honour
    pub fn validate(&self) -> RasterResult<()> {
        if self.attribute_field.trim().is_empty() {
            return Err(RasterError::InvalidArgument("attribute field must not be empty".to_string()));
        }
        if self.input_vector.is_empty() || self.output_raster.is_empty() {
            return Err(RasterError::InvalidArgument("input and output paths are required".to_string()));
        }
        for (name, value) in [("x resolution", self.x_res), ("y resolution", self.y_res)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RasterError::InvalidArgument(format!(
                    "{} must be a positive number, got {}", name, value)));
            }
        }
        if let Some(bbox) = &self.bounding_box {
            BoundingBox::new(bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax)?;
        }
        Ok(())
    }
}

/// Parameters that burn `vector` onto the grid of `template`
pub fn params_from_template(
    template: &str,
    input_vector: &str,
    output_raster: &str,
    attribute_field: &str,
) -> RasterResult<RasterizeParams> {
    let extent = ExtentResolver::resolve(template)?;
    let params = RasterizeParams::with_extent(input_vector, output_raster, attribute_field, &extent);
    debug!("Rasterize parameters from {}: {:?}", template, params);
    Ok(params)
}
