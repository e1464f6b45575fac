//! CLI command implementations
//!
//! One command per subcommand, created by `RastermaskCommandFactory`.

pub mod command_traits;
pub mod extent_command;
pub mod info_command;
pub mod rasterize_command;
pub mod convert_command;

pub use command_traits::{Command, CommandFactory};
pub use extent_command::ExtentCommand;
pub use info_command::InfoCommand;
pub use rasterize_command::RasterizeCommand;
pub use convert_command::ConvertCommand;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use crate::config::Config;
use crate::errors::{RasterError, RasterResult};

/// Command-line definition of the `rastermask` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("rastermask")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Align rasters to templates, write georeferenced arrays and burn vector masks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .global(true),
        )
        .subcommand(
            ClapCommand::new("extent")
                .about("Print resolution, size and bounds of a template raster")
                .arg(Arg::new("template").help("Template raster").required(true).index(1)),
        )
        .subcommand(
            ClapCommand::new("info")
                .about("Print size, bands, pixel type and georeferencing of a raster")
                .arg(Arg::new("input").help("Input raster").required(true).index(1)),
        )
        .subcommand(
            ClapCommand::new("rasterize")
                .about("Burn a vector attribute into a Byte GeoTIFF mask")
                .arg(Arg::new("vector").help("Input vector layer").required(true).index(1))
                .arg(Arg::new("output").help("Output raster").required(true).index(2))
                .arg(
                    Arg::new("field")
                        .short('a')
                        .long("field")
                        .help("Attribute to burn")
                        .value_name("NAME")
                        .required(true),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .help("Raster whose grid the mask follows")
                        .value_name("FILE")
                        .conflicts_with("resolution"),
                )
                .arg(
                    Arg::new("resolution")
                        .long("resolution")
                        .help("Pixel size in map units")
                        .value_name("RES"),
                )
                .arg(
                    Arg::new("y-resolution")
                        .long("y-resolution")
                        .help("Vertical pixel size, defaults to --resolution")
                        .value_name("RES")
                        .requires("resolution"),
                )
                .arg(
                    Arg::new("bbox")
                        .long("bbox")
                        .help("Output bounds (xmin,ymin,xmax,ymax)")
                        .value_name("BBOX")
                        .requires("resolution"),
                ),
        )
        .subcommand(
            ClapCommand::new("convert")
                .about("Rewrite a raster with other compression, pixel type or NoData")
                .arg(Arg::new("input").help("Input raster").required(true).index(1))
                .arg(Arg::new("output").help("Output raster").required(true).index(2))
                .arg(
                    Arg::new("compress")
                        .long("compress")
                        .help("Compression (none, deflate, zstd)")
                        .value_name("NAME"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("Output pixel type, e.g. Byte or Float32")
                        .value_name("TYPE"),
                )
                .arg(
                    Arg::new("nodata")
                        .long("nodata")
                        .help("NoData value for every band")
                        .value_name("VALUE")
                        .allow_hyphen_values(true),
                ),
        )
}

/// Picks the command for the chosen subcommand
#[derive(Default)]
pub struct RastermaskCommandFactory;

impl RastermaskCommandFactory {
    pub fn new() -> Self {
        RastermaskCommandFactory
    }
}

impl<'a> CommandFactory<'a> for RastermaskCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &'a Config) -> RasterResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some(("extent", sub)) => Ok(Box::new(ExtentCommand::new(sub)?)),
            Some(("info", sub)) => Ok(Box::new(InfoCommand::new(sub)?)),
            Some(("rasterize", sub)) => Ok(Box::new(RasterizeCommand::new(sub, config)?)),
            Some(("convert", sub)) => Ok(Box::new(ConvertCommand::new(sub, config)?)),
            Some((name, _)) => Err(RasterError::InvalidArgument(format!("Unknown command: {}", name))),
            None => Err(RasterError::InvalidArgument("No command given, see --help".to_string())),
        }
    }
}

/// Required string argument
pub(crate) fn required_arg(args: &ArgMatches, name: &str) -> RasterResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| RasterError::InvalidArgument(format!("Missing argument: {}", name)))
}

/// Optional argument parsed with `FromStr`
pub(crate) fn parsed_arg<T>(args: &ArgMatches, name: &str) -> RasterResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    args.get_one::<String>(name)
        .map(|value| value.parse::<T>()
            .map_err(|e| RasterError::InvalidArgument(format!("Invalid --{} '{}': {}", name, value, e))))
        .transpose()
}
