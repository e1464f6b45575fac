//! Tests for the byte order module

use std::io::Cursor;
use byteorder::{LittleEndian, BigEndian, WriteBytesExt};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler, LittleEndianHandler, BigEndianHandler};

#[test]
fn test_byte_order_detection_little_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    let mut cursor = Cursor::new(buffer);

    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x4D4D).unwrap(); // MM
    let mut cursor = Cursor::new(buffer);

    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    let mut cursor = Cursor::new(buffer);

    assert!(ByteOrder::detect(&mut cursor).is_err());
}

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_i32::<LittleEndian>(-7).unwrap();
    buffer.write_u64::<LittleEndian>(0x1234567890ABCDEF).unwrap();
    buffer.write_f64::<LittleEndian>(30.5).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_i32(&mut cursor).unwrap(), -7);
    assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
    assert_eq!(handler.read_f64(&mut cursor).unwrap(), 30.5);
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_i16::<BigEndian>(-300).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_f32::<BigEndian>(-1.25).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_i16(&mut cursor).unwrap(), -300);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    assert_eq!(handler.read_f32(&mut cursor).unwrap(), -1.25);
}

#[test]
fn test_inline_bytes_restore_file_order() {
    // "AB" stored left-justified in a 4-byte value field
    let le_field = u32::from_le_bytes([b'A', b'B', 0, 0]) as u64;
    let be_field = u32::from_be_bytes([b'A', b'B', 0, 0]) as u64;

    assert_eq!(LittleEndianHandler.inline_bytes(le_field, false), vec![b'A', b'B', 0, 0]);
    assert_eq!(BigEndianHandler.inline_bytes(be_field, false), vec![b'A', b'B', 0, 0]);
    assert_eq!(LittleEndianHandler.inline_bytes(1, true).len(), 8);
}
