//! TIFF file reader implementation
//!
//! Parses the header and IFD chain of TIFF/BigTIFF files and decodes tag
//! payloads. The reader remembers the path it loaded so later payload reads
//! can reopen the file instead of keeping a handle alive.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read, SeekFrom};
use std::path::Path;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::errors::{RasterError, RasterResult};
use crate::tiff::constants::field_types;
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::{format_utils, ifd_utils, string_utils, tag_utils};

/// Directory chains longer than this are treated as corrupt
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Current file path
    current_file: Option<String>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            current_file: None,
            is_big_tiff: false,
        }
    }

    /// Opens the loaded file again for payload reads
    pub(crate) fn create_reader(&self) -> RasterResult<BufReader<File>> {
        match &self.current_file {
            Some(path) => Ok(BufReader::new(File::open(path)?)),
            None => Err(RasterError::GenericError("No file path specified".to_string())),
        }
    }

    fn handler(&self) -> RasterResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| RasterError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Loads a TIFF file from the given path
    ///
    /// The file handle is closed again before this returns.
    pub fn load(&mut self, filepath: &str) -> RasterResult<TIFF> {
        info!("Loading TIFF file: {}", filepath);
        self.current_file = Some(filepath.to_string());

        let file = File::open(Path::new(filepath))?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);

        self.read(&mut reader)
    }

    /// Reads the header and IFD chain from the given reader
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> RasterResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let handler = format_utils::detect_byte_order(reader)?;
        let (is_big_tiff, _) = format_utils::detect_tiff_format(reader, handler.as_ref())?;
        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, handler.as_ref())?;
        debug!("First IFD offset: {}", first_ifd_offset);

        self.byte_order_handler = Some(handler);
        self.is_big_tiff = is_big_tiff;

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(RasterError::InvalidHeader);
        }

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// A broken link ends the chain with a warning; directories read so far
    /// are kept.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> RasterResult<Vec<IFD>> {
        let handler = self.handler()?;
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // The entry loop leaves the stream on the next-IFD link
            let next_ifd_offset = match ifd_utils::read_ifd_offset(reader, self.is_big_tiff, handler) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);

            if next_ifd_offset != 0 && validation::validate_ifd_offset(next_ifd_offset, file_size).is_err() {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads a single IFD located at `offset`
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> RasterResult<IFD> {
        let handler = self.handler()?;
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let tag = handler.read_u16(reader)?;
            let field_type = handler.read_u16(reader)?;
            let (count, value_offset) = if self.is_big_tiff {
                (handler.read_u64(reader)?, handler.read_u64(reader)?)
            } else {
                (handler.read_u32(reader)? as u64, handler.read_u32(reader)? as u64)
            };

            ifd.add_entry(IFDEntry::new(tag, field_type, count, value_offset));
        }

        Ok(ifd)
    }

    /// Reads the raw payload bytes of a tag, in the file's byte order
    pub fn read_tag_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> RasterResult<Vec<u8>> {
        let handler = self.handler()?;
        let size = entry.payload_size() as usize;

        if entry.is_value_inline(self.is_big_tiff) {
            let mut bytes = handler.inline_bytes(entry.value_offset, self.is_big_tiff);
            bytes.truncate(size);
            return Ok(bytes);
        }

        let file_size = validation::get_file_size(reader)?;
        validation::validate_data_range(entry.value_offset, size as u64, file_size)?;

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut bytes = vec![0u8; size];
        reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads an integer tag as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> RasterResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(RasterError::TagNotFound(tag))?;
        let bytes = self.read_tag_bytes(reader, entry)?;
        tag_utils::decode_integer_values(&bytes, entry, self.handler()?)
    }

    /// Reads a DOUBLE or FLOAT tag as a vector of f64
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> RasterResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(RasterError::TagNotFound(tag))?;
        let bytes = self.read_tag_bytes(reader, entry)?;
        tag_utils::decode_double_values(&bytes, entry, self.handler()?)
    }

    /// Reads an ASCII tag, with trailing NULs removed
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> RasterResult<String> {
        let entry = ifd.get_entry(tag).ok_or(RasterError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII {
            return Err(RasterError::UnsupportedFieldType(entry.field_type));
        }

        let mut bytes = self.read_tag_bytes(reader, entry)?;
        string_utils::trim_trailing_nulls(&mut bytes);

        String::from_utf8(bytes)
            .map_err(|e| RasterError::GenericError(format!("Invalid UTF-8 string: {}", e)))
    }

    /// Reads `length` bytes at `offset` from the loaded file
    pub fn read_bytes_at(&self, reader: &mut dyn SeekableReader, offset: u64, length: u64) -> RasterResult<Vec<u8>> {
        let file_size = validation::get_file_size(reader)?;
        validation::validate_data_range(offset, length, file_size)?;

        reader.seek(SeekFrom::Start(offset))?;
        let mut bytes = vec![0u8; length as usize];
        reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Gets the current byte order handler
    pub fn get_byte_order_handler(&self) -> Option<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
    }
}
