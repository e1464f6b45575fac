//! Seekable reader trait
//!
//! Raster files are read by jumping between directory entries, strip
//! offsets and tag payloads, so every reader must be able to seek.

use std::io::{Read, Seek};

/// Reader that can both read and seek
///
/// Implemented for files, buffered files and in-memory cursors alike.
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}
