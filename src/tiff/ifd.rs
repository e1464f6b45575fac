//! Image File Directory (IFD) structures and methods
//!
//! An IFD holds the tag entries describing one image in a TIFF file:
//! its dimensions, sample layout, strip locations and, for GeoTIFF, the
//! georeferencing tags.

use std::collections::HashMap;
use std::fmt;
use crate::tiff::constants::tags;
use log::trace;
use crate::utils::{tag_utils, tiff_utils};

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Cached tag values for quick lookup
    tag_map: HashMap<u16, IFDEntry>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// For small payloads `value_offset` holds the value itself, otherwise the
/// file offset where the values are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value or offset to values
    pub value_offset: u64,
}

impl IFDEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        trace!("IFD entry: tag={} ({}), type={} ({}), count={}, offset/value={}",
               tag, tag_utils::get_tag_name(tag), field_type,
               tag_utils::get_field_type_name(field_type), count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
        }
    }

    /// Size in bytes of a single value of this entry's field type
    pub fn get_field_type_size(&self) -> usize {
        tiff_utils::get_field_type_size(self.field_type)
    }

    /// Total payload size in bytes
    pub fn payload_size(&self) -> u64 {
        self.get_field_type_size() as u64 * self.count
    }

    /// Whether the payload is stored in the value field itself
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        self.payload_size() <= inline_size
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, replacing any existing entry for the same tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding tag {} to IFD #{}", entry.tag, self.number);

        self.entries.retain(|e| e.tag != entry.tag);
        self.tag_map.insert(entry.tag, entry.clone());
        self.entries.push(entry);
    }

    /// Removes the entry for a tag, if present
    pub fn remove_entry(&mut self, tag: u16) {
        self.entries.retain(|e| e.tag != tag);
        self.tag_map.remove(&tag);
    }

    /// Gets a tag's value/offset field directly
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.tag_map.get(&tag).map(|entry| entry.value_offset)
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag)
    }

    /// Width and height of the image, if both tags are present
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Number of samples per pixel (1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Whether this directory is a reduced-resolution overview
    pub fn is_overview(&self) -> bool {
        self.get_tag_value(tags::NEW_SUBFILE_TYPE)
            .map(|subfile_type| subfile_type & 1 == 1)
            .unwrap_or(false)
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;
        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            let value_display = match entry.tag {
                tags::COMPRESSION => format!("{} ({})",
                                             entry.value_offset,
                                             tag_utils::get_compression_name(entry.value_offset)),
                _ => entry.value_offset.to_string(),
            };

            writeln!(f, "    {} ({}): {} [{} x{}]",
                     entry.tag,
                     tag_utils::get_tag_name(entry.tag),
                     value_display,
                     tag_utils::get_field_type_name(entry.field_type),
                     entry.count)?;
        }

        Ok(())
    }
}
