//! Metadata tag strategies
//!
//! GDAL-specific extension tags and descriptive tags.

use crate::tiff::constants::tags;
use crate::tiff::ifd::IFD;
use crate::utils::tiff_utils::{self, ExternalData};
use log::info;

/// Handles metadata tags in TIFF files
pub struct MetadataBuilder;

impl MetadataBuilder {
    /// Add a GDAL NoData tag
    ///
    /// GDAL keeps NoData as ASCII text in tag 42113, one value per file.
    pub fn add_nodata_tag(ifd: &mut IFD, external_data: &mut ExternalData, nodata: f64) {
        let text = Self::format_nodata(nodata);
        info!("Adding GDAL NoData tag: {}", text);
        tiff_utils::set_ascii_tag(ifd, external_data, tags::GDAL_NODATA, &text);
    }

    /// Text form of a NoData value as GDAL reads it back
    pub fn format_nodata(nodata: f64) -> String {
        if nodata.is_nan() {
            "nan".to_string()
        } else {
            nodata.to_string()
        }
    }

    /// Parse the NoData tag text
    pub fn parse_nodata(text: &str) -> Option<f64> {
        text.trim().parse::<f64>().ok()
    }

    /// Add the Software tag
    pub fn add_software_tag(ifd: &mut IFD, external_data: &mut ExternalData, software: &str) {
        tiff_utils::set_ascii_tag(ifd, external_data, tags::SOFTWARE, software);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodata_text_round_trips() {
        for value in [0.0, -9999.0, 255.0, 1.5e-7, f64::MAX] {
            let text = MetadataBuilder::format_nodata(value);
            assert_eq!(MetadataBuilder::parse_nodata(&text), Some(value));
        }
        assert_eq!(MetadataBuilder::format_nodata(0.0), "0");
        assert!(MetadataBuilder::parse_nodata("nan").unwrap().is_nan());
        assert_eq!(MetadataBuilder::parse_nodata("garbage"), None);
    }

    #[test]
    fn short_nodata_stays_inline() {
        let mut ifd = IFD::new(0, 0);
        let mut external = ExternalData::new();
        MetadataBuilder::add_nodata_tag(&mut ifd, &mut external, 0.0);

        let entry = ifd.get_entry(tags::GDAL_NODATA).unwrap();
        assert_eq!(entry.count, 2);
        assert_eq!(entry.value_offset, u32::from_le_bytes([b'0', 0, 0, 0]) as u64);
        assert!(external.is_empty());
    }
}
