//! GeoTIFF tag strategies
//!
//! Encodes a GDAL-style geotransform and projection string as GeoTIFF
//! model tags and a GeoKey directory.

use crate::raster::geo_transform::GeoTransform;
use crate::tiff::constants::{tags, geo_keys, geo_values};
use crate::tiff::geo_key_parser::{GeoKeyEntry, get_key_name};
use crate::tiff::ifd::IFD;
use crate::utils::projection_utils::{self, CrsKind};
use crate::utils::tiff_utils::{self, ExternalData};
use log::{debug, info, warn};

/// Handles GeoTIFF tags
pub struct GeoTagsBuilder;

impl GeoTagsBuilder {
    /// Store the affine transform
    ///
    /// North-up grids with a negative pixel height are written as
    /// ModelPixelScale + ModelTiepoint. Anything else needs the full
    /// ModelTransformation matrix.
    pub fn add_geo_transform(ifd: &mut IFD, external_data: &mut ExternalData, geo_transform: &GeoTransform) {
        info!("Setting geotransform {}", geo_transform);

        if geo_transform.is_north_up() && geo_transform.pixel_height < 0.0 {
            tiff_utils::remove_tag(ifd, external_data, tags::MODEL_TRANSFORMATION_TAG);

            let pixel_scale = [geo_transform.pixel_width, -geo_transform.pixel_height, 0.0];
            let tiepoint = [0.0, 0.0, 0.0, geo_transform.origin_x, geo_transform.origin_y, 0.0];
            debug!("Pixel scale {:?}, tiepoint {:?}", pixel_scale, tiepoint);

            tiff_utils::set_double_tag(ifd, external_data, tags::MODEL_PIXEL_SCALE_TAG, &pixel_scale);
            tiff_utils::set_double_tag(ifd, external_data, tags::MODEL_TIEPOINT_TAG, &tiepoint);
        } else {
            tiff_utils::remove_tag(ifd, external_data, tags::MODEL_PIXEL_SCALE_TAG);
            tiff_utils::remove_tag(ifd, external_data, tags::MODEL_TIEPOINT_TAG);

            let gt = geo_transform;
            let matrix = [
                gt.pixel_width, gt.row_rotation, 0.0, gt.origin_x,
                gt.col_rotation, gt.pixel_height, 0.0, gt.origin_y,
                0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ];
            debug!("Model transformation {:?}", matrix);

            tiff_utils::set_double_tag(ifd, external_data, tags::MODEL_TRANSFORMATION_TAG, &matrix);
        }
    }

    /// Store the projection descriptor
    ///
    /// The descriptor itself always goes into GTCitationGeoKey. When it
    /// names an EPSG code, the matching GeographicType or ProjectedCSType
    /// key is set as well. The descriptor is stored as given; a blank one
    /// clears the GeoKeys.
    pub fn add_projection(ifd: &mut IFD, external_data: &mut ExternalData, projection: &str) {
        if projection.trim().is_empty() {
            warn!("Empty projection, no GeoKeys written");
            for tag in [tags::GEO_KEY_DIRECTORY_TAG, tags::GEO_ASCII_PARAMS_TAG] {
                tiff_utils::remove_tag(ifd, external_data, tag);
            }
            return;
        }

        let code = projection_utils::epsg_code(projection.trim());
        let kind = projection_utils::crs_kind(projection.trim(), code.unwrap_or(0));
        info!("Setting projection {} (EPSG code: {:?}, {:?})", projection, code, kind);

        let model_type = match kind {
            CrsKind::Geographic => geo_values::MODEL_TYPE_GEOGRAPHIC,
            CrsKind::Projected => geo_values::MODEL_TYPE_PROJECTED,
        };

        let ascii_params = format!("{}|", projection);

        let mut keys = vec![
            GeoKeyEntry::short(geo_keys::GT_MODEL_TYPE, model_type),
            GeoKeyEntry::short(geo_keys::GT_RASTER_TYPE, geo_values::RASTER_PIXEL_IS_AREA),
            GeoKeyEntry::new(geo_keys::GT_CITATION, tags::GEO_ASCII_PARAMS_TAG, ascii_params.len() as u16, 0),
        ];
        if let Some(code) = code {
            let key_id = match kind {
                CrsKind::Geographic => geo_keys::GEOGRAPHIC_TYPE,
                CrsKind::Projected => geo_keys::PROJECTED_CS_TYPE,
            };
            keys.push(GeoKeyEntry::short(key_id, code));
        }

        let directory = Self::encode_key_directory(&mut keys);
        tiff_utils::set_short_tag(ifd, external_data, tags::GEO_KEY_DIRECTORY_TAG, &directory);
        tiff_utils::set_ascii_tag(ifd, external_data, tags::GEO_ASCII_PARAMS_TAG, &ascii_params);
    }

    /// Flatten GeoKeys into the SHORT array of the GeoKeyDirectory tag
    ///
    /// Keys are sorted by ID as the directory requires.
    pub fn encode_key_directory(keys: &mut [GeoKeyEntry]) -> Vec<u16> {
        keys.sort_by_key(|key| key.key_id);

        let mut directory = vec![
            geo_keys::DIRECTORY_VERSION,
            geo_keys::KEY_REVISION,
            geo_keys::MINOR_REVISION,
            keys.len() as u16,
        ];
        for key in keys.iter() {
            debug!("GeoKey {} ({}) = {}", key.key_id, get_key_name(key.key_id), key.value_offset);
            directory.extend_from_slice(&[key.key_id, key.tiff_tag_location, key.count, key.value_offset]);
        }
        directory
    }
}
