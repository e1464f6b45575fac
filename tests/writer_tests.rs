//! End-to-end tests for writing rasters and resolving their extents

use std::fs;

use ndarray::{array, Array2, Array3};
use rastermask::{
    ExtentResolver, GeoTransform, PixelArray, PixelType, RasterDataset, RasterError, RasterOptions,
    RasterWriter,
};

fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

fn init_logging() {
    rastermask::utils::logger::init_env();
}

#[test]
fn template_extent_of_written_raster() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "template.tif");

    let options = RasterOptions::new()
        .with_geo_transform(GeoTransform::north_up(100.0, 500.0, 10.0, -10.0))
        .with_projection("EPSG:32633");
    let array = PixelArray::from_2d(Array2::<u8>::zeros((40, 50)));
    RasterWriter::new().write(&path, &array, &options, None).unwrap();

    let extent = ExtentResolver::resolve(&path).unwrap();
    assert_eq!((extent.columns, extent.rows), (50, 40));
    assert_eq!((extent.x_res, extent.y_res), (10.0, 10.0));
    assert_eq!((extent.xmin, extent.ymin, extent.xmax, extent.ymax), (100.0, 100.0, 600.0, 500.0));
}

#[test]
fn template_extent_below_the_equator() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "template_south.tif");

    let options = RasterOptions::new()
        .with_geo_transform(GeoTransform::from_gdal([100.0, 10.0, 0.0, 200.0, 0.0, -10.0]))
        .with_projection("EPSG:32633");
    let array = PixelArray::from_2d(Array2::<u8>::zeros((40, 50)));
    RasterWriter::new().write(&path, &array, &options, None).unwrap();

    let extent = ExtentResolver::resolve(&path).unwrap();
    assert_eq!((extent.columns, extent.rows), (50, 40));
    assert_eq!(extent.resolution(), (10.0, 10.0));
    assert_eq!((extent.xmin, extent.ymin, extent.xmax, extent.ymax), (100.0, -200.0, 600.0, 200.0));
}

#[test]
fn zeros_with_nodata_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "zeros.tif");

    let options = RasterOptions::new()
        .with_geo_transform(GeoTransform::north_up(0.0, 3.0, 1.0, -1.0))
        .with_projection("EPSG:4326");
    let array = PixelArray::from_3d(Array3::<f32>::zeros((3, 3, 1)));
    RasterWriter::new().write(&path, &array, &options, Some(0.0)).unwrap();

    let dataset = RasterDataset::open(&path).unwrap();
    assert_eq!(dataset.raster_count(), 1);
    assert_eq!(dataset.pixel_type(), PixelType::Float32);
    assert_eq!(dataset.band_nodata(1).unwrap(), Some(0.0));
    assert_eq!(dataset.read_band::<f32>(1).unwrap(), Array2::<f32>::zeros((3, 3)));
}

#[test]
fn multi_band_array_geotransform_and_projection_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "bands.tif");

    let wkt = r#"PROJCS["WGS 84 / UTM zone 33N",GEOGCS["WGS 84",AUTHORITY["EPSG","4326"]],AUTHORITY["EPSG","32633"]]"#;
    let gt = GeoTransform::north_up(500_000.0, 4_000_000.0, 30.0, -30.0);
    let options = RasterOptions::new()
        .with_geo_transform(gt)
        .with_projection(wkt)
        .with_creation_option("COMPRESS", "DEFLATE");

    let band1 = array![[1i16, -2, 3], [4, 5, -6]];
    let band2 = array![[10i16, 20, 30], [40, 50, 60]];
    let band3 = array![[-100i16, 0, 100], [i16::MIN, i16::MAX, 7]];
    let array = PixelArray::from_bands(&[band1.clone(), band2.clone(), band3.clone()]).unwrap();
    RasterWriter::new().write(&path, &array, &options, Some(-9999.0)).unwrap();

    let dataset = RasterDataset::open(&path).unwrap();
    assert_eq!(dataset.raster_size(), (3, 2));
    assert_eq!(dataset.raster_count(), 3);
    assert_eq!(dataset.pixel_type(), PixelType::Int16);
    assert_eq!(dataset.geo_transform(), Some(gt));
    assert_eq!(dataset.projection(), wkt);
    for band in 1..=3 {
        assert_eq!(dataset.band_nodata(band).unwrap(), Some(-9999.0));
    }
    assert_eq!(dataset.read_band::<i16>(1).unwrap(), band1);
    assert_eq!(dataset.read_band::<i16>(3).unwrap(), band3);
    assert_eq!(dataset.read_array::<i16>().unwrap(), array);
}

#[test]
fn template_supplies_missing_properties() {
    let dir = tempfile::tempdir().unwrap();
    let template = temp_path(&dir, "template.tif");
    let output = temp_path(&dir, "derived.tif");

    let gt = GeoTransform::from_gdal([1000.0, 2.0, 0.5, 2000.0, 0.25, -2.0]);
    let template_options = RasterOptions::new()
        .with_geo_transform(gt)
        .with_projection("EPSG:3857")
        .with_pixel_type(PixelType::UInt16);
    let ones = PixelArray::filled(4, 4, 1, 1u8);
    RasterWriter::new().write(&template, &ones, &template_options, None).unwrap();

    let values = PixelArray::from_2d(array![[0.4f64, 1.6], [300.0, -5.0]]);
    let options = RasterOptions::new().with_template(template.as_str());
    RasterWriter::new().write(&output, &values, &options, None).unwrap();

    let dataset = RasterDataset::open(&output).unwrap();
    assert_eq!(dataset.geo_transform(), Some(gt));
    assert_eq!(dataset.projection(), "EPSG:3857");
    assert_eq!(dataset.pixel_type(), PixelType::UInt16);
    assert_eq!(dataset.band_nodata(1).unwrap(), None);
    // Saturating conversion into UInt16
    assert_eq!(dataset.read_band::<u16>(1).unwrap(), array![[0u16, 1], [300, 0]]);
}

#[test]
fn explicit_pixel_type_overrides_array_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "float64.tif");

    let options = RasterOptions::new()
        .with_geo_transform(GeoTransform::north_up(0.0, 0.0, 0.5, -0.5))
        .with_projection("EPSG:4326")
        .with_pixel_type(PixelType::Float64)
        .with_creation_option("COMPRESS", "ZSTD");
    let array = PixelArray::from_2d(array![[1u8, 2], [3, 4]]);
    RasterWriter::new().write(&path, &array, &options, Some(f64::NAN)).unwrap();

    let dataset = RasterDataset::open(&path).unwrap();
    assert_eq!(dataset.pixel_type(), PixelType::Float64);
    assert!(dataset.band_nodata(1).unwrap().unwrap().is_nan());
    assert_eq!(dataset.read_band::<f64>(1).unwrap(), array![[1.0, 2.0], [3.0, 4.0]]);
}

#[test]
fn nonexistent_template_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = temp_path(&dir, "missing.tif");
    let output = temp_path(&dir, "never.tif");

    assert!(matches!(ExtentResolver::resolve(&missing), Err(RasterError::ResourceNotFound { .. })));

    let options = RasterOptions::new().with_template(missing.as_str());
    let array = PixelArray::filled(2, 2, 1, 0u8);
    let result = RasterWriter::new().write(&output, &array, &options, None);
    assert!(matches!(result, Err(RasterError::ResourceNotFound { .. })));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_metadata_and_unknown_driver() {
    let dir = tempfile::tempdir().unwrap();
    let output = temp_path(&dir, "out.tif");
    let array = PixelArray::filled(2, 2, 1, 0u8);

    let result = RasterWriter::new().write(&output, &array, &RasterOptions::new(), None);
    assert!(matches!(result, Err(RasterError::MissingMetadata("geo_transform"))));

    let options = RasterOptions::new()
        .with_geo_transform(GeoTransform::north_up(0.0, 0.0, 1.0, -1.0))
        .with_projection("EPSG:4326")
        .with_driver("HFA");
    let result = RasterWriter::new().write(&output, &array, &options, None);
    assert!(matches!(result, Err(RasterError::UnknownDriver(name)) if name == "HFA"));

    assert!(!std::path::Path::new(&output).exists());
}
