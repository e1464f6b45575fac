//! Factory for creating compression handlers

use crate::errors::{RasterError, RasterResult};
use crate::tiff::constants::compression;
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for a Compression tag value
    pub fn create_handler(code: u64) -> RasterResult<Box<dyn CompressionHandler>> {
        match code as u16 {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE | compression::DEFLATE_OBSOLETE => Ok(Box::new(AdobeDeflateHandler)),
            compression::ZSTD => Ok(Box::new(ZstdHandler::new())),
            _ => Err(RasterError::UnsupportedCompression(code))
        }
    }

    /// Get a handler by its `COMPRESS=` creation option name
    pub fn get_handler_by_name(name: &str) -> RasterResult<Box<dyn CompressionHandler>> {
        match name.to_lowercase().as_str() {
            "uncompressed" | "none" => Ok(Box::new(UncompressedHandler)),
            "deflate" | "zip" | "adobe deflate" => Ok(Box::new(AdobeDeflateHandler)),
            "zstd" => Ok(Box::new(ZstdHandler::new())),
            _ => Err(RasterError::InvalidArgument(format!("Unknown compression type: {}", name)))
        }
    }
}
