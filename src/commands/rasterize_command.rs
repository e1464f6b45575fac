//! Vector rasterization command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::{parsed_arg, required_arg};
use crate::config::Config;
use crate::errors::{RasterError, RasterResult};
use crate::raster::geo_transform::BoundingBox;
use crate::rasterize::{GdalRasterize, MaskPipeline, RasterizeParams, VectorRasterizer};

/// Where the output grid comes from
#[derive(Debug, Clone, PartialEq)]
enum Grid {
    Template(String),
    Resolution { x_res: f64, y_res: f64, bounding_box: Option<BoundingBox> },
}

/// Burns a vector attribute into a Byte mask
pub struct RasterizeCommand {
    input_vector: String,
    output_raster: String,
    field: String,
    grid: Grid,
    rasterizer: GdalRasterize,
}

impl RasterizeCommand {
    pub fn new(args: &ArgMatches, config: &Config) -> RasterResult<Self> {
        let template = args.get_one::<String>("template").cloned();
        let resolution: Option<f64> = parsed_arg(args, "resolution")?;
        let bounding_box: Option<BoundingBox> = parsed_arg(args, "bbox")?;

        let grid = match (template, resolution) {
            (Some(template), None) => {
                if bounding_box.is_some() {
                    return Err(RasterError::InvalidArgument(
                        "--bbox cannot be combined with --template".to_string()));
                }
                Grid::Template(template)
            }
            (None, Some(res)) => {
                let y_res = parsed_arg(args, "y-resolution")?.unwrap_or(res);
                Grid::Resolution { x_res: res, y_res, bounding_box }
            }
            _ => return Err(RasterError::InvalidArgument(
                "Give exactly one of --template or --resolution".to_string())),
        };

        Ok(RasterizeCommand {
            input_vector: required_arg(args, "vector")?,
            output_raster: required_arg(args, "output")?,
            field: required_arg(args, "field")?,
            grid,
            rasterizer: GdalRasterize::with_binary(config.rasterizer_binary.clone()),
        })
    }

    /// Run against any rasterizer
    fn run_with<R: VectorRasterizer>(&self, rasterizer: R) -> RasterResult<()> {
        let pipeline = MaskPipeline::new(rasterizer);
        match &self.grid {
            Grid::Template(template) => {
                let extent = pipeline.burn(template, &self.input_vector, &self.output_raster, &self.field)?;
                info!("Mask aligned to {} ({}x{})", template, extent.columns, extent.rows);
            }
            Grid::Resolution { x_res, y_res, bounding_box: Some(bbox) } => {
                let params = RasterizeParams::with_resolution(
                    self.input_vector.as_str(), self.output_raster.as_str(), self.field.as_str(), *x_res, *y_res)
                    .bounded_by(*bbox)
                    .aligned(true);
                params.validate()?;
                pipeline.rasterizer().run(&params)?;
            }
            Grid::Resolution { x_res, y_res, bounding_box: None } => {
                pipeline.burn_at_resolution(&self.input_vector, &self.output_raster, &self.field, *x_res, *y_res)?;
            }
        }
        Ok(())
    }
}

impl Command for RasterizeCommand {
    fn execute(&self) -> RasterResult<()> {
        self.run_with(&self.rasterizer)?;
        println!("Wrote {}", self.output_raster);
        Ok(())
    }
}
