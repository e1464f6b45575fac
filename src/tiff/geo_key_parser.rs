//! GeoTIFF georeferencing parser
//!
//! Recovers the affine transform and the projection descriptor from the
//! GeoTIFF tags of an IFD.

use log::{debug, warn};

use crate::errors::{RasterError, RasterResult};
use crate::io::seekable::SeekableReader;
use crate::raster::geo_transform::GeoTransform;
use crate::tiff::constants::{geo_keys, geo_values, tags};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::string_utils;

/// One entry of the GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    /// GeoKey identifier
    pub key_id: u16,
    /// 0 for inline SHORT values, else the tag holding the value
    pub tiff_tag_location: u16,
    /// Number of values
    pub count: u16,
    /// Inline value, or index into the referenced tag
    pub value_offset: u16,
}

impl GeoKeyEntry {
    pub fn new(key_id: u16, tiff_tag_location: u16, count: u16, value_offset: u16) -> Self {
        GeoKeyEntry { key_id, tiff_tag_location, count, value_offset }
    }

    /// Inline SHORT value
    pub fn short(key_id: u16, value: u16) -> Self {
        GeoKeyEntry::new(key_id, 0, 1, value)
    }
}

/// Get the name of a GeoKey
pub fn get_key_name(key_id: u16) -> &'static str {
    match key_id {
        geo_keys::GT_MODEL_TYPE => "GTModelTypeGeoKey",
        geo_keys::GT_RASTER_TYPE => "GTRasterTypeGeoKey",
        geo_keys::GT_CITATION => "GTCitationGeoKey",
        geo_keys::GEOGRAPHIC_TYPE => "GeographicTypeGeoKey",
        geo_keys::GEOG_CITATION => "GeogCitationGeoKey",
        geo_keys::PROJECTED_CS_TYPE => "ProjectedCSTypeGeoKey",
        geo_keys::PROJ_CITATION => "PCSCitationGeoKey",
        _ => "Unknown",
    }
}

/// Parser for GeoTIFF geographic metadata
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parse the GeoKey directory of an IFD
    ///
    /// Returns an empty list when the IFD carries no directory.
    pub fn parse_geo_key_directory(
        reader: &TiffReader,
        stream: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> RasterResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let values = reader.read_tag_values(stream, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
        if values.len() < 4 {
            return Err(RasterError::GenericError("Invalid GeoKey directory header".to_string()));
        }

        let num_keys = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], num_keys);

        let available = (values.len() - 4) / 4;
        if available < num_keys {
            warn!("GeoKey directory declares {} keys but holds {}", num_keys, available);
        }

        let geo_keys = values[4..]
            .chunks_exact(4)
            .take(num_keys)
            .map(|key| GeoKeyEntry::new(key[0] as u16, key[1] as u16, key[2] as u16, key[3] as u16))
            .inspect(|key| debug!("GeoKey: id={} ({}), location={}, count={}, value={}",
                                  key.key_id, get_key_name(key.key_id), key.tiff_tag_location,
                                  key.count, key.value_offset))
            .collect();

        Ok(geo_keys)
    }

    /// Read the affine transform of an IFD
    ///
    /// ModelTransformation wins when present; otherwise the first tiepoint
    /// and the pixel scale are combined. Returns `None` for rasters without
    /// georeferencing.
    pub fn read_geo_transform(
        reader: &TiffReader,
        stream: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> RasterResult<Option<GeoTransform>> {
        if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
            let m = reader.read_tag_doubles(stream, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
            if m.len() < 16 {
                return Err(RasterError::GenericError(format!(
                    "ModelTransformation holds {} values, expected 16", m.len())));
            }
            return Ok(Some(GeoTransform::from_gdal([m[3], m[0], m[1], m[7], m[4], m[5]])));
        }

        if !ifd.has_tag(tags::MODEL_TIEPOINT_TAG) || !ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) {
            return Ok(None);
        }

        let tiepoint = reader.read_tag_doubles(stream, ifd, tags::MODEL_TIEPOINT_TAG)?;
        let scale = reader.read_tag_doubles(stream, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
        if tiepoint.len() < 6 || scale.len() < 2 {
            warn!("Incomplete tiepoint/pixel scale tags, ignoring georeferencing");
            return Ok(None);
        }

        // Tiepoint (i, j, k, x, y, z) anchors raster position (i, j) at (x, y)
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (scale_x, scale_y) = (scale[0], scale[1]);

        Ok(Some(GeoTransform::north_up(
            x - i * scale_x,
            y + j * scale_y,
            scale_x,
            -scale_y,
        )))
    }

    /// Read the projection descriptor of an IFD
    ///
    /// The GTCitation text is returned verbatim when present. Otherwise a
    /// projected or geographic EPSG code is rendered as `EPSG:<code>`.
    pub fn read_projection(
        reader: &TiffReader,
        stream: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> RasterResult<Option<String>> {
        let geo_keys = Self::parse_geo_key_directory(reader, stream, ifd)?;
        if geo_keys.is_empty() {
            return Ok(None);
        }

        let find = |id: u16| geo_keys.iter().find(|key| key.key_id == id);

        if let Some(citation) = find(geo_keys::GT_CITATION) {
            if let Some(text) = Self::read_ascii_key(reader, stream, ifd, citation)? {
                if !text.is_empty() {
                    return Ok(Some(text));
                }
            }
        }

        for id in [geo_keys::PROJECTED_CS_TYPE, geo_keys::GEOGRAPHIC_TYPE] {
            if let Some(key) = find(id) {
                if key.tiff_tag_location == 0 && key.value_offset != geo_values::USER_DEFINED {
                    return Ok(Some(format!("EPSG:{}", key.value_offset)));
                }
            }
        }

        Ok(None)
    }

    /// Text value of a GeoKey stored in GeoAsciiParams
    fn read_ascii_key(
        reader: &TiffReader,
        stream: &mut dyn SeekableReader,
        ifd: &IFD,
        key: &GeoKeyEntry,
    ) -> RasterResult<Option<String>> {
        if key.tiff_tag_location != tags::GEO_ASCII_PARAMS_TAG || !ifd.has_tag(tags::GEO_ASCII_PARAMS_TAG) {
            return Ok(None);
        }

        let params = reader.read_tag_ascii(stream, ifd, tags::GEO_ASCII_PARAMS_TAG)?;
        Ok(string_utils::geo_ascii_slice(&params, key.value_offset as usize, key.count as usize))
    }
}
