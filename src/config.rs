//! TOML configuration for the CLI
//!
//! ```toml
//! [rasterizer]
//! binary = "/usr/bin/gdal_rasterize"
//!
//! [writer]
//! compress = "DEFLATE"
//!
//! [logging]
//! file = "rastermask.log"
//! ```
//!
//! Every key is optional.

use std::fs;

use log::{debug, warn};

use crate::errors::{RasterError, RasterResult};
use crate::rasterize::GDAL_RASTERIZE;

/// Default log file of the CLI
pub const DEFAULT_LOG_FILE: &str = "rastermask.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Executable used for rasterization
    pub rasterizer_binary: String,
    /// Default `COMPRESS` creation option for written rasters
    pub compress: Option<String>,
    /// Log file; `None` logs to the console only
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rasterizer_binary: GDAL_RASTERIZE.to_string(),
            compress: None,
            log_file: Some(DEFAULT_LOG_FILE.to_string()),
        }
    }
}

impl Config {
    /// Read a config file
    pub fn load(path: &str) -> RasterResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RasterError::InvalidArgument(format!("cannot read config {}: {}", path, e)))?;
        let config = Self::parse(&content)?;
        debug!("Loaded config from {}: {:?}", path, config);
        Ok(config)
    }

    /// Parse config text, falling back to defaults for absent keys
    pub fn parse(content: &str) -> RasterResult<Self> {
        let value: toml::Value = content.parse()
            .map_err(|e| RasterError::InvalidArgument(format!("invalid config: {}", e)))?;
        let mut config = Config::default();

        if let Some(binary) = Self::string_key(&value, "rasterizer", "binary") {
            config.rasterizer_binary = binary;
        }
        if let Some(compress) = Self::string_key(&value, "writer", "compress") {
            config.compress = Some(compress);
        }
        if let Some(file) = Self::string_key(&value, "logging", "file") {
            config.log_file = if file.is_empty() { None } else { Some(file) };
        }

        if let Some(table) = value.as_table() {
            for section in table.keys() {
                if !matches!(section.as_str(), "rasterizer" | "writer" | "logging") {
                    warn!("Ignoring unknown config section [{}]", section);
                }
            }
        }
        Ok(config)
    }

    fn string_key(value: &toml::Value, section: &str, key: &str) -> Option<String> {
        let entry = value.get(section)?.get(key)?;
        match entry.as_str() {
            Some(text) => Some(text.to_string()),
            None => {
                warn!("Config key {}.{} should be a string, ignoring", section, key);
                None
            }
        }
    }
}
