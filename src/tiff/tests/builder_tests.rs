//! Tests for the GeoTIFF builder

use std::fs;

use crate::compression::{AdobeDeflateHandler, UncompressedHandler};
use crate::errors::RasterError;
use crate::raster::geo_transform::GeoTransform;
use crate::raster::pixel::PixelType;
use crate::tiff::builder::TiffBuilder;
use crate::tiff::constants::{compression, geo_keys, tags};
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::reader::TiffReader;

fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_written_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "two_bands.tif");

    let mut builder = TiffBuilder::create(&path, 3, 2, 2, PixelType::UInt16, Box::new(UncompressedHandler)).unwrap();
    builder.set_geo_transform(&GeoTransform::north_up(100.0, 500.0, 10.0, -10.0));
    builder.set_projection("EPSG:4326");
    builder.set_nodata(-1.0);

    let band0: Vec<u8> = (0..6u16).flat_map(|v| v.to_le_bytes()).collect();
    let band1: Vec<u8> = (10..16u16).flat_map(|v| v.to_le_bytes()).collect();
    builder.write_band(1, &band1).unwrap();
    builder.write_band(0, &band0).unwrap();
    builder.finish().unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.load(&path).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let mut stream = reader.create_reader().unwrap();

    assert_eq!(reader.read_tag_values(&mut stream, ifd, tags::IMAGE_WIDTH).unwrap(), vec![3]);
    assert_eq!(reader.read_tag_values(&mut stream, ifd, tags::SAMPLES_PER_PIXEL).unwrap(), vec![2]);
    assert_eq!(reader.read_tag_values(&mut stream, ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![16, 16]);
    assert_eq!(reader.read_tag_ascii(&mut stream, ifd, tags::GDAL_NODATA).unwrap(), "-1");

    let offsets = reader.read_tag_values(&mut stream, ifd, tags::STRIP_OFFSETS).unwrap();
    let counts = reader.read_tag_values(&mut stream, ifd, tags::STRIP_BYTE_COUNTS).unwrap();
    assert_eq!(counts, vec![12, 12]);
    // Band 2 was streamed first
    assert!(offsets[1] < offsets[0]);
    assert_eq!(reader.read_bytes_at(&mut stream, offsets[0], counts[0]).unwrap(), band0);
    assert_eq!(reader.read_bytes_at(&mut stream, offsets[1], counts[1]).unwrap(), band1);

    let gt = GeoKeyParser::read_geo_transform(&reader, &mut stream, ifd).unwrap().unwrap();
    assert_eq!(gt, GeoTransform::north_up(100.0, 500.0, 10.0, -10.0));
    let projection = GeoKeyParser::read_projection(&reader, &mut stream, ifd).unwrap();
    assert_eq!(projection.as_deref(), Some("EPSG:4326"));
}

#[test]
fn test_rotated_transform_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "rotated.tif");
    let gt = GeoTransform::from_gdal([1000.0, 2.0, 0.25, 2000.0, 0.5, -2.0]);

    let mut builder = TiffBuilder::create(&path, 1, 1, 1, PixelType::Byte, Box::new(UncompressedHandler)).unwrap();
    builder.set_geo_transform(&gt);
    builder.write_band(0, &[7]).unwrap();
    builder.finish().unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.load(&path).unwrap();
    let mut stream = reader.create_reader().unwrap();
    let ifd = &tiff.ifds[0];

    assert!(ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG));
    assert_eq!(GeoKeyParser::read_geo_transform(&reader, &mut stream, ifd).unwrap(), Some(gt));
    assert_eq!(GeoKeyParser::read_projection(&reader, &mut stream, ifd).unwrap(), None);
}

#[test]
fn test_unwritten_band_is_zero_filled() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "partial.tif");

    let builder = TiffBuilder::create(&path, 4, 4, 1, PixelType::Float32, Box::new(AdobeDeflateHandler)).unwrap();
    builder.finish().unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.load(&path).unwrap();
    let mut stream = reader.create_reader().unwrap();
    let ifd = &tiff.ifds[0];

    assert_eq!(reader.read_tag_values(&mut stream, ifd, tags::COMPRESSION).unwrap(),
               vec![compression::DEFLATE as u64]);
    let count = reader.read_tag_values(&mut stream, ifd, tags::STRIP_BYTE_COUNTS).unwrap()[0];
    assert!(count > 0 && count < 64);
}

#[test]
fn test_unfinished_file_has_no_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "unfinished.tif");

    {
        let mut builder = TiffBuilder::create(&path, 2, 2, 1, PixelType::Byte, Box::new(UncompressedHandler)).unwrap();
        builder.write_band(0, &[1, 2, 3, 4]).unwrap();
        builder.flush().unwrap();
    }

    assert!(fs::metadata(&path).unwrap().len() >= 12);
    assert!(TiffReader::new().load(&path).is_err());
}

#[test]
fn test_band_size_and_index_are_checked() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "checked.tif");

    let mut builder = TiffBuilder::create(&path, 2, 2, 1, PixelType::Int16, Box::new(UncompressedHandler)).unwrap();
    assert!(matches!(builder.write_band(0, &[0u8; 4]), Err(RasterError::InvalidArgument(_))));
    assert!(matches!(builder.write_band(1, &[0u8; 8]), Err(RasterError::InvalidArgument(_))));
    assert!(TiffBuilder::create(&path, 0, 2, 1, PixelType::Byte, Box::new(UncompressedHandler)).is_err());
}

#[test]
fn test_projection_whitespace_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "padded_projection.tif");

    let mut builder = TiffBuilder::create(&path, 1, 1, 1, PixelType::Byte, Box::new(UncompressedHandler)).unwrap();
    builder.set_geo_transform(&GeoTransform::north_up(0.0, 1.0, 1.0, -1.0));
    builder.set_projection(" EPSG:4326 ");
    builder.write_band(0, &[7]).unwrap();
    builder.finish().unwrap();

    let mut reader = TiffReader::new();
    let tiff = reader.load(&path).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let mut stream = reader.create_reader().unwrap();

    let projection = GeoKeyParser::read_projection(&reader, &mut stream, ifd).unwrap();
    assert_eq!(projection.as_deref(), Some(" EPSG:4326 "));

    let directory = reader.read_tag_values(&mut stream, ifd, tags::GEO_KEY_DIRECTORY_TAG).unwrap();
    assert!(directory.chunks_exact(4).any(|key| key == [geo_keys::GEOGRAPHIC_TYPE as u64, 0, 1, 4326]));
}
