//! Template extent command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::RasterResult;
use crate::extent::ExtentResolver;

/// Prints the resolution and bounds of a template raster
pub struct ExtentCommand {
    template: String,
}

impl ExtentCommand {
    pub fn new(args: &ArgMatches) -> RasterResult<Self> {
        Ok(ExtentCommand {
            template: required_arg(args, "template")?,
        })
    }
}

impl Command for ExtentCommand {
    fn execute(&self) -> RasterResult<()> {
        info!("Resolving extent of {}", self.template);
        let extent = ExtentResolver::resolve(&self.template)?;
        println!("{}", extent);
        Ok(())
    }
}
