//! Raster rewrite command
//!
//! Reads a raster and writes it again through `RasterWriter`, using the
//! input as the template for georeferencing.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::{parsed_arg, required_arg};
use crate::config::Config;
use crate::compression::CompressionFactory;
use crate::errors::RasterResult;
use crate::raster::dataset::RasterDataset;
use crate::raster::options::RasterOptions;
use crate::raster::pixel::PixelType;
use crate::writer::RasterWriter;

/// Rewrites a raster with new compression, pixel type or NoData
pub struct ConvertCommand {
    input_file: String,
    output_file: String,
    compress: Option<String>,
    pixel_type: Option<PixelType>,
    nodata: Option<f64>,
}

impl ConvertCommand {
    pub fn new(args: &ArgMatches, config: &Config) -> RasterResult<Self> {
        let compress = args.get_one::<String>("compress").cloned().or_else(|| config.compress.clone());
        if let Some(name) = &compress {
            let handler = CompressionFactory::get_handler_by_name(name)?;
            info!("Using compression: {}", handler.name());
        }

        Ok(ConvertCommand {
            input_file: required_arg(args, "input")?,
            output_file: required_arg(args, "output")?,
            compress,
            pixel_type: parsed_arg(args, "type")?,
            nodata: parsed_arg(args, "nodata")?,
        })
    }

    fn options(&self) -> RasterOptions {
        let mut options = RasterOptions::new().with_template(self.input_file.as_str());
        if let Some(pixel_type) = self.pixel_type {
            options = options.with_pixel_type(pixel_type);
        }
        if let Some(compress) = &self.compress {
            options = options.with_creation_option("COMPRESS", compress);
        }
        options
    }
}

impl Command for ConvertCommand {
    fn execute(&self) -> RasterResult<()> {
        info!("Converting {} to {}", self.input_file, self.output_file);

        let input = RasterDataset::open(&self.input_file)?;
        let array = input.read_array::<f64>()?;
        let nodata = match self.nodata {
            Some(value) => Some(value),
            None => input.band_nodata(1)?,
        };
        drop(input);

        RasterWriter::new()
            .with_progress(true)
            .write(&self.output_file, &array, &self.options(), nodata)?;
        println!("Wrote {}", self.output_file);
        Ok(())
    }
}
