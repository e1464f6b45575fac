//! Compression handler trait definition

use crate::errors::RasterResult;

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip
    fn decompress(&self, data: &[u8]) -> RasterResult<Vec<u8>>;

    /// Compress one strip
    fn compress(&self, data: &[u8]) -> RasterResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Value of the TIFF Compression tag
    fn code(&self) -> u16;
}
