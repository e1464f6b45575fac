//! Write options and metadata resolution
//!
//! Every property of a new raster is taken from the explicit options first
//! and from the template raster second.

use log::{debug, info};

use crate::errors::{RasterError, RasterResult};
use crate::raster::array::PixelArray;
use crate::raster::dataset::RasterDataset;
use crate::raster::driver::GTIFF_DRIVER;
use crate::raster::geo_transform::GeoTransform;
use crate::raster::pixel::{PixelType, RasterElement};

/// Explicit settings for a raster write
///
/// Unset fields are resolved from `template` when one is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterOptions {
    pub geo_transform: Option<GeoTransform>,
    pub projection: Option<String>,
    pub pixel_type: Option<PixelType>,
    pub driver_name: Option<String>,
    /// Path of a raster to borrow unset properties from
    pub template: Option<String>,
    /// GDAL-style `KEY=VALUE` creation options
    pub creation_options: Vec<String>,
}

impl RasterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geo_transform(mut self, geo_transform: GeoTransform) -> Self {
        self.geo_transform = Some(geo_transform);
        self
    }

    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }

    pub fn with_pixel_type(mut self, pixel_type: PixelType) -> Self {
        self.pixel_type = Some(pixel_type);
        self
    }

    pub fn with_driver(mut self, driver_name: impl Into<String>) -> Self {
        self.driver_name = Some(driver_name.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Add a creation option, replacing an earlier value for the same key
    pub fn with_creation_option(mut self, key: &str, value: &str) -> Self {
        let prefix = format!("{}=", key.to_ascii_uppercase());
        self.creation_options
            .retain(|option| !option.to_ascii_uppercase().starts_with(&prefix));
        self.creation_options.push(format!("{}={}", key.to_ascii_uppercase(), value));
        self
    }

    /// Value of a creation option, keys compared case-insensitively
    pub fn creation_option(&self, key: &str) -> Option<&str> {
        creation_option(&self.creation_options, key)
    }

    /// Resolve the metadata of a raster holding `array`
    ///
    /// The template is only opened when some property was not given
    /// explicitly.
    pub fn resolve<T: RasterElement>(&self, array: &PixelArray<T>, nodata: Option<f64>) -> RasterResult<RasterMetadata> {
        let complete = self.geo_transform.is_some()
            && self.projection.is_some()
            && self.pixel_type.is_some()
            && self.driver_name.is_some();

        let template = match (&self.template, complete) {
            (Some(path), false) => {
                info!("Reading missing raster properties from template {}", path);
                Some(RasterDataset::open(path)?)
            }
            _ => None,
        };

        self.resolve_with(template.as_ref(), array, nodata)
    }

    /// Resolve against an already opened template
    pub fn resolve_with<T: RasterElement>(
        &self,
        template: Option<&RasterDataset>,
        array: &PixelArray<T>,
        nodata: Option<f64>,
    ) -> RasterResult<RasterMetadata> {
        let (rows, columns, band_count) = array.shape();

        let geo_transform = self.geo_transform
            .or_else(|| template.and_then(|t| t.geo_transform()))
            .ok_or(RasterError::MissingMetadata("geo_transform"))?;
        geo_transform.validate()?;

        // An empty template projection counts as absent
        let projection = self.projection.clone()
            .or_else(|| template.map(|t| t.projection()).filter(|p| !p.is_empty()))
            .ok_or(RasterError::MissingMetadata("projection"))?;

        let pixel_type = self.pixel_type
            .or_else(|| template.map(|t| t.pixel_type()))
            .unwrap_or(T::PIXEL_TYPE);

        let driver_name = self.driver_name.clone()
            .or_else(|| template.map(|t| t.driver_name().to_string()))
            .unwrap_or_else(|| GTIFF_DRIVER.to_string());

        let metadata = RasterMetadata {
            columns,
            rows,
            band_count,
            geo_transform,
            projection,
            pixel_type,
            driver_name,
            nodata,
        };
        debug!("Resolved raster metadata: {:?}", metadata);
        Ok(metadata)
    }
}

/// Look up `key` in a list of `KEY=VALUE` strings
pub fn creation_option<'a>(options: &'a [String], key: &str) -> Option<&'a str> {
    options.iter().rev().find_map(|option| {
        let (k, v) = option.split_once('=')?;
        k.trim().eq_ignore_ascii_case(key).then(|| v.trim())
    })
}

/// Fully resolved properties of a raster about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    pub columns: usize,
    pub rows: usize,
    pub band_count: usize,
    pub geo_transform: GeoTransform,
    pub projection: String,
    pub pixel_type: PixelType,
    pub driver_name: String,
    pub nodata: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit() -> RasterOptions {
        RasterOptions::new()
            .with_geo_transform(GeoTransform::north_up(0.0, 10.0, 1.0, -1.0))
            .with_projection("EPSG:4326")
    }

    #[test]
    fn explicit_values_and_defaults() {
        let array = PixelArray::<i16>::filled(4, 5, 2, 0);
        let metadata = explicit().resolve(&array, Some(-9999.0)).unwrap();

        assert_eq!((metadata.rows, metadata.columns, metadata.band_count), (4, 5, 2));
        assert_eq!(metadata.pixel_type, PixelType::Int16);
        assert_eq!(metadata.driver_name, "GTiff");
        assert_eq!(metadata.nodata, Some(-9999.0));
    }

    #[test]
    fn missing_fields_are_reported() {
        let array = PixelArray::<u8>::filled(1, 1, 1, 0);

        let no_transform = RasterOptions::new().with_projection("EPSG:4326");
        assert!(matches!(no_transform.resolve(&array, None),
                         Err(RasterError::MissingMetadata("geo_transform"))));

        let no_projection = RasterOptions::new()
            .with_geo_transform(GeoTransform::north_up(0.0, 0.0, 1.0, -1.0));
        assert!(matches!(no_projection.resolve(&array, None),
                         Err(RasterError::MissingMetadata("projection"))));
    }

    #[test]
    fn empty_explicit_projection_is_kept() {
        let array = PixelArray::<u8>::filled(1, 1, 1, 0);
        let metadata = explicit().with_projection("").resolve(&array, None).unwrap();
        assert_eq!(metadata.projection, "");
    }

    #[test]
    fn unreadable_template_is_not_found() {
        let array = PixelArray::<u8>::filled(1, 1, 1, 0);
        let options = RasterOptions::new().with_template("/nonexistent/template.tif");
        assert!(matches!(options.resolve(&array, None), Err(RasterError::ResourceNotFound { .. })));
    }

    #[test]
    fn creation_options_replace_and_match_case() {
        let options = RasterOptions::new()
            .with_creation_option("compress", "LZW")
            .with_creation_option("COMPRESS", "DEFLATE");
        assert_eq!(options.creation_options, vec!["COMPRESS=DEFLATE".to_string()]);
        assert_eq!(options.creation_option("Compress"), Some("DEFLATE"));
        assert_eq!(options.creation_option("TILED"), None);
    }
}
