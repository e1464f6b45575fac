//! Basic TIFF tag strategies
//!
//! Image structure tags for a planar-separate raster: dimensions, per-band
//! sample layout, compression and the strip directory.

use crate::raster::pixel::PixelType;
use crate::tiff::constants::{tags, photometric, planar_config};
use crate::tiff::ifd::IFD;
use crate::utils::tiff_utils::{self, ExternalData};
use log::debug;

/// Adds basic TIFF tags to an IFD
pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    /// Add the structure tags of a `columns x rows x bands` image
    ///
    /// Each band is stored as a single strip of its own
    /// (PlanarConfiguration = 2), so RowsPerStrip equals the image height.
    pub fn add_band_layout_tags(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        columns: u32,
        rows: u32,
        bands: u16,
        pixel_type: PixelType,
        compression_code: u16,
    ) {
        debug!("Adding layout tags: {}x{}x{} {} (compression {})",
               columns, rows, bands, pixel_type, compression_code);

        tiff_utils::set_long_tag(ifd, external_data, tags::IMAGE_WIDTH, &[columns]);
        tiff_utils::set_long_tag(ifd, external_data, tags::IMAGE_LENGTH, &[rows]);

        Self::add_bits_per_sample(ifd, external_data, &vec![pixel_type.bits_per_sample(); bands as usize]);

        tiff_utils::set_short_tag(ifd, external_data, tags::COMPRESSION, &[compression_code]);
        tiff_utils::set_short_tag(ifd, external_data, tags::PHOTOMETRIC_INTERPRETATION, &[photometric::BLACK_IS_ZERO]);
        tiff_utils::set_short_tag(ifd, external_data, tags::SAMPLES_PER_PIXEL, &[bands]);
        tiff_utils::set_long_tag(ifd, external_data, tags::ROWS_PER_STRIP, &[rows]);
        tiff_utils::set_short_tag(ifd, external_data, tags::PLANAR_CONFIGURATION, &[planar_config::PLANAR]);

        // Samples beyond the first are unspecified extra channels
        if bands > 1 {
            tiff_utils::set_short_tag(ifd, external_data, tags::EXTRA_SAMPLES, &vec![0u16; bands as usize - 1]);
        }

        tiff_utils::set_short_tag(ifd, external_data, tags::SAMPLE_FORMAT,
                                  &vec![pixel_type.sample_format(); bands as usize]);
    }

    /// Add BitsPerSample, one value per band
    pub fn add_bits_per_sample(ifd: &mut IFD, external_data: &mut ExternalData, bits_per_channel: &[u16]) {
        debug!("Adding BitsPerSample: {:?}", bits_per_channel);
        tiff_utils::set_short_tag(ifd, external_data, tags::BITS_PER_SAMPLE, bits_per_channel);
    }

    /// Record where each band's strip landed
    pub fn set_strip_layout(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        strip_offsets: &[u32],
        strip_byte_counts: &[u32],
    ) {
        debug!("Strip layout: offsets={:?}, byte counts={:?}", strip_offsets, strip_byte_counts);
        tiff_utils::set_long_tag(ifd, external_data, tags::STRIP_OFFSETS, strip_offsets);
        tiff_utils::set_long_tag(ifd, external_data, tags::STRIP_BYTE_COUNTS, strip_byte_counts);
    }
}
