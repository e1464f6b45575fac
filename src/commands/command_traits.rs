//! Command pattern interfaces

use crate::config::Config;
use crate::errors::RasterResult;

/// An executable CLI operation
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> RasterResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create the command selected by `args`
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Settings loaded from the config file
    fn create_command(&self, args: &clap::ArgMatches, config: &'a Config) -> RasterResult<Box<dyn Command + 'a>>;
}
