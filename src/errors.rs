//! Error types for raster reading, writing and rasterization

use std::fmt;
use std::io;

/// Errors raised while resolving, reading, writing or burning rasters
#[derive(Debug)]
pub enum RasterError {
    /// Template or input path does not reference a readable raster
    ResourceNotFound { path: String, reason: String },
    /// A required raster property could not be resolved from arguments or template
    MissingMetadata(&'static str),
    /// External rasterizer returned non-zero or produced no output
    ExternalToolFailure {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },
    /// No driver registered under the given short name
    UnknownDriver(String),
    /// Caller supplied an argument that cannot be honoured
    InvalidArgument(String),
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported combination of SampleFormat and BitsPerSample
    UnsupportedSampleFormat { format: u16, bits: u16 },
    /// Image dimensions not found
    MissingDimensions,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::ResourceNotFound { path, reason } => {
                write!(f, "Raster not found or unreadable: {} ({})", path, reason)
            }
            RasterError::MissingMetadata(field) => {
                write!(f, "Missing raster metadata: no {} given and none available from a template", field)
            }
            RasterError::ExternalToolFailure { tool, status, stderr } => {
                match status {
                    Some(code) => write!(f, "{} failed with exit status {}", tool, code)?,
                    None => write!(f, "{} failed", tool)?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            RasterError::UnknownDriver(name) => write!(f, "Unknown raster driver: {}", name),
            RasterError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            RasterError::IoError(e) => write!(f, "I/O error: {}", e),
            RasterError::InvalidHeader => write!(f, "Invalid TIFF header"),
            RasterError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            RasterError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            RasterError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            RasterError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            RasterError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            RasterError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            RasterError::UnsupportedSampleFormat { format, bits } => {
                write!(f, "Unsupported sample format {} with {} bits per sample", format, bits)
            }
            RasterError::MissingDimensions => write!(f, "Image dimensions not found"),
            RasterError::GenericError(msg) => write!(f, "Raster error: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RasterError {
    fn from(error: io::Error) -> Self {
        RasterError::IoError(error)
    }
}

impl From<String> for RasterError {
    fn from(msg: String) -> Self {
        RasterError::GenericError(msg)
    }
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;

impl RasterError {
    /// Wrap a failure to open a raster as `ResourceNotFound`
    pub fn not_found(path: &str, reason: impl fmt::Display) -> Self {
        RasterError::ResourceNotFound {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
