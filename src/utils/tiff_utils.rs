//! TIFF tag construction helpers
//!
//! Payloads that fit in the IFD value field are packed inline, larger ones
//! are parked in the builder's external data map and get their offset
//! assigned at write time.

use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::constants::field_types;
use log::trace;
use std::collections::HashMap;

/// External tag payloads keyed by tag ID
pub type ExternalData = HashMap<u16, Vec<u8>>;

/// Bytes needed by one value of a TIFF field type
pub fn get_field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Pack a little-endian payload of at most 4 bytes into a value field
pub fn pack_inline_le(data: &[u8]) -> u64 {
    let mut field = [0u8; 4];
    field[..data.len()].copy_from_slice(data);
    u32::from_le_bytes(field) as u64
}

/// Add a tag whose payload is already encoded as little-endian bytes
///
/// Small payloads go inline, the rest is stored as external data. Any
/// previous entry or payload for the same tag is replaced.
pub fn set_tag_payload(
    ifd: &mut IFD,
    external_data: &mut ExternalData,
    tag: u16,
    field_type: u16,
    count: u64,
    data: Vec<u8>,
) {
    external_data.remove(&tag);

    if data.len() <= 4 {
        trace!("Tag {} stored inline ({} bytes)", tag, data.len());
        ifd.add_entry(IFDEntry::new(tag, field_type, count, pack_inline_le(&data)));
    } else {
        trace!("Tag {} stored externally ({} bytes)", tag, data.len());
        ifd.add_entry(IFDEntry::new(tag, field_type, count, 0));
        external_data.insert(tag, data);
    }
}

/// Add a SHORT array tag
pub fn set_short_tag(ifd: &mut IFD, external_data: &mut ExternalData, tag: u16, values: &[u16]) {
    let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    set_tag_payload(ifd, external_data, tag, field_types::SHORT, values.len() as u64, data);
}

/// Add a LONG array tag
pub fn set_long_tag(ifd: &mut IFD, external_data: &mut ExternalData, tag: u16, values: &[u32]) {
    let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    set_tag_payload(ifd, external_data, tag, field_types::LONG, values.len() as u64, data);
}

/// Add a DOUBLE array tag
pub fn set_double_tag(ifd: &mut IFD, external_data: &mut ExternalData, tag: u16, values: &[f64]) {
    let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    set_tag_payload(ifd, external_data, tag, field_types::DOUBLE, values.len() as u64, data);
}

/// Add a NUL-terminated ASCII tag
pub fn set_ascii_tag(ifd: &mut IFD, external_data: &mut ExternalData, tag: u16, text: &str) {
    let mut data = text.as_bytes().to_vec();
    data.push(0);
    let count = data.len() as u64;
    set_tag_payload(ifd, external_data, tag, field_types::ASCII, count, data);
}

/// Remove a tag and any external payload it owns
pub fn remove_tag(ifd: &mut IFD, external_data: &mut ExternalData, tag: u16) {
    ifd.remove_entry(tag);
    external_data.remove(&tag);
}
