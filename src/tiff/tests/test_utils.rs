use std::io::Cursor;
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

/// A raw IFD entry for hand-built test files: tag, type, count, value field
pub type RawEntry = (u16, u16, u32, u32);

/// Creates a classic little-endian TIFF with one 800x600 IFD
pub fn create_test_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();      // IFD offset

    buffer.write_u16::<LittleEndian>(2).unwrap();      // Entry count

    // ImageWidth, LONG
    buffer.write_u16::<LittleEndian>(256).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(800).unwrap();

    // ImageLength, LONG
    buffer.write_u16::<LittleEndian>(257).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(600).unwrap();

    // No next IFD
    buffer.write_u32::<LittleEndian>(0).unwrap();

    Cursor::new(buffer)
}

/// Creates a little-endian BigTIFF with one 1024x768 IFD
pub fn create_test_bigtiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    // BigTIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(43).unwrap();     // BigTIFF version
    buffer.write_u16::<LittleEndian>(8).unwrap();      // Offset size
    buffer.write_u16::<LittleEndian>(0).unwrap();      // Reserved
    buffer.write_u64::<LittleEndian>(16).unwrap();     // IFD offset

    buffer.write_u64::<LittleEndian>(2).unwrap();      // Entry count

    buffer.write_u16::<LittleEndian>(256).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u64::<LittleEndian>(1).unwrap();
    buffer.write_u64::<LittleEndian>(1024).unwrap();

    buffer.write_u16::<LittleEndian>(257).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u64::<LittleEndian>(1).unwrap();
    buffer.write_u64::<LittleEndian>(768).unwrap();

    buffer.write_u64::<LittleEndian>(0).unwrap();

    Cursor::new(buffer)
}

/// Builds a classic TIFF in byte order `B` from raw entries plus a data block
///
/// The IFD sits at offset 8 and `payload` follows it directly; entries that
/// point into the payload use `payload_offset(entry_count) + n`.
pub fn build_classic_tiff<B: ByteOrder>(marker: u16, entries: &[RawEntry], payload: &[u8]) -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(marker).unwrap();
    buffer.write_u16::<B>(42).unwrap();
    buffer.write_u32::<B>(8).unwrap();

    buffer.write_u16::<B>(entries.len() as u16).unwrap();
    for &(tag, field_type, count, value) in entries {
        buffer.write_u16::<B>(tag).unwrap();
        buffer.write_u16::<B>(field_type).unwrap();
        buffer.write_u32::<B>(count).unwrap();
        buffer.write_u32::<B>(value).unwrap();
    }
    buffer.write_u32::<B>(0).unwrap();
    buffer.extend_from_slice(payload);

    Cursor::new(buffer)
}

/// File offset of the byte following a classic IFD with `entry_count` entries
pub fn payload_offset(entry_count: usize) -> u32 {
    8 + 2 + 12 * entry_count as u32 + 4
}

/// Value field holding two SHORTs inline, as laid out in a big-endian file
pub fn inline_shorts_be(first: u16, second: u16) -> u32 {
    let mut field = [0u8; 4];
    BigEndian::write_u16(&mut field[0..2], first);
    BigEndian::write_u16(&mut field[2..4], second);
    BigEndian::read_u32(&field)
}
