//! Compression handling for TIFF strips
//!
//! One strategy per supported TIFF compression scheme; the factory picks
//! the handler from a Compression tag value or a GDAL-style option name.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
