//! Raster summary command

use clap::ArgMatches;
use log::debug;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::RasterResult;
use crate::extent::RasterExtent;
use crate::raster::dataset::RasterDataset;

/// Prints size, bands, pixel type and georeferencing of a raster
pub struct InfoCommand {
    input_file: String,
}

impl InfoCommand {
    pub fn new(args: &ArgMatches) -> RasterResult<Self> {
        Ok(InfoCommand {
            input_file: required_arg(args, "input")?,
        })
    }

    /// Text report for an opened dataset
    pub fn report(dataset: &RasterDataset) -> RasterResult<String> {
        let (columns, rows) = dataset.raster_size();
        let mut lines = vec![
            format!("File: {}", dataset.path()),
            format!("Driver: {}", dataset.driver_name()),
            format!("Size: {} x {}", columns, rows),
            format!("Bands: {} ({})", dataset.raster_count(), dataset.pixel_type()),
        ];

        match dataset.geo_transform() {
            Some(gt) => {
                lines.push(format!("GeoTransform: {}", gt));
                lines.push(format!("Bounds: {}",
                                   RasterExtent::from_geo_transform(&gt, columns, rows).bounding_box()));
            }
            None => lines.push("GeoTransform: none".to_string()),
        }

        let projection = dataset.projection();
        lines.push(format!("Projection: {}", if projection.is_empty() { "none" } else { projection.as_str() }));

        match dataset.band_nodata(1)? {
            Some(nodata) => lines.push(format!("NoData: {}", nodata)),
            None => lines.push("NoData: none".to_string()),
        }
        Ok(lines.join("\n"))
    }
}

impl Command for InfoCommand {
    fn execute(&self) -> RasterResult<()> {
        debug!("Reading raster info for {}", self.input_file);
        let dataset = RasterDataset::open(&self.input_file)?;
        println!("{}", Self::report(&dataset)?);
        Ok(())
    }
}
