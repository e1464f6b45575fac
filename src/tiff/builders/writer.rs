//! Streaming TIFF writer
//!
//! Writes a classic little-endian TIFF front to back: the header goes out
//! first with a zero IFD offset, band strips are appended as they arrive,
//! and the IFD plus any out-of-line tag payloads are written last. Closing
//! patches the header to point at the IFD. A file that was never finished
//! therefore has no IFD and is rejected by readers.

use crate::errors::{RasterError, RasterResult};
use crate::tiff::constants::header;
use crate::tiff::ifd::IFD;
use crate::utils::tiff_utils::ExternalData;
use crate::utils::{ifd_utils, write_utils};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};

/// Offset of the first-IFD pointer in a classic TIFF header
const FIRST_IFD_POINTER: u64 = 4;

/// Appends strips to a TIFF file and finishes it with its IFD
pub struct TiffStreamWriter {
    writer: BufWriter<File>,
    position: u64,
    path: String,
}

impl TiffStreamWriter {
    /// Create the output file and write the header placeholder
    pub fn create(output_path: &str) -> RasterResult<Self> {
        info!("Creating TIFF file {}", output_path);

        let file = File::create(output_path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);

        writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;
        writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&[0u8; 4])?;

        Ok(TiffStreamWriter {
            writer,
            position: header::CLASSIC_HEADER_SIZE,
            path: output_path.to_string(),
        })
    }

    /// Path of the file being written
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a block of bytes on a word boundary and return its offset
    pub fn append(&mut self, data: &[u8]) -> RasterResult<u32> {
        let offset = self.position;
        let end = offset + data.len() as u64;
        if end > u32::MAX as u64 {
            return Err(RasterError::GenericError(format!(
                "{} would exceed the 4 GiB limit of classic TIFF", self.path)));
        }

        self.writer.write_all(data)?;
        write_utils::write_padding(&mut self.writer, data.len())?;
        self.position = write_utils::align_to_word(end);

        debug!("Appended {} bytes at offset {}", data.len(), offset);
        Ok(offset as u32)
    }

    /// Push buffered bytes to the file
    pub fn flush(&mut self) -> RasterResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Write the IFD and its external payloads, then patch the header
    pub fn finish(mut self, ifd: &IFD, external_data: &ExternalData) -> RasterResult<()> {
        let entries = write_utils::get_sorted_entries(&ifd.entries);

        let mut payload_offsets: HashMap<u16, u32> = HashMap::new();
        for entry in &entries {
            if let Some(data) = external_data.get(&entry.tag) {
                let offset = self.append(data)?;
                payload_offsets.insert(entry.tag, offset);
            }
        }

        let ifd_offset = self.position;
        let ifd_size = ifd_utils::calculate_ifd_size(entries.len(), false);
        if ifd_offset + ifd_size > u32::MAX as u64 {
            return Err(RasterError::GenericError(format!(
                "{} would exceed the 4 GiB limit of classic TIFF", self.path)));
        }
        debug!("Writing IFD with {} entries at offset {}", entries.len(), ifd_offset);

        self.writer.write_all(&(entries.len() as u16).to_le_bytes())?;
        for entry in &entries {
            let value_offset = payload_offsets.get(&entry.tag)
                .map(|&offset| offset as u64)
                .unwrap_or(entry.value_offset);

            self.writer.write_all(&entry.tag.to_le_bytes())?;
            self.writer.write_all(&entry.field_type.to_le_bytes())?;
            self.writer.write_all(&(entry.count as u32).to_le_bytes())?;
            self.writer.write_all(&(value_offset as u32).to_le_bytes())?;
        }
        self.writer.write_all(&0u32.to_le_bytes())?;
        self.position += ifd_size;

        self.writer.seek(SeekFrom::Start(FIRST_IFD_POINTER))?;
        self.writer.write_all(&(ifd_offset as u32).to_le_bytes())?;
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        info!("Finished {} ({} bytes)", self.path, self.position);
        Ok(())
    }
}
