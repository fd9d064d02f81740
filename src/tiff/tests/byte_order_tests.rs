//! Tests for the byte order module

extern crate std;

use std::io::Cursor;
use byteorder::{LittleEndian, BigEndian, WriteBytesExt};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler, LittleEndianHandler, BigEndianHandler};
use crate::tiff::errors::TiffError;

#[test]
fn test_detect_from_marker() {
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let mut cursor = Cursor::new(order.marker().to_vec());
        std::assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), order);
    }
}

#[test]
fn test_detect_rejects_unknown_marker() {
    let mut cursor = Cursor::new(std::vec![0x12u8, 0x34]);
    std::assert!(std::matches!(ByteOrder::detect(&mut cursor), Err(TiffError::InvalidByteOrder(0x3412))));
}

#[test]
fn test_detect_on_short_input() {
    let mut cursor = Cursor::new(std::vec![0x49u8]);
    std::assert!(std::matches!(ByteOrder::detect(&mut cursor), Err(TiffError::IoError(_))));
}

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_u32::<LittleEndian>(300).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_rational(&mut cursor).unwrap(), (300, 1));
    std::assert_eq!(handler.decode_u16([0x34, 0x12]), 0x1234);
    std::assert_eq!(handler.decode_u32([0x78, 0x56, 0x34, 0x12]), 0x12345678);
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u32::<BigEndian>(72).unwrap();
    buffer.write_u32::<BigEndian>(2).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = ByteOrder::BigEndian.create_handler();

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_rational(&mut cursor).unwrap(), (72, 2));
    std::assert_eq!(BigEndianHandler.decode_u16([0x12, 0x34]), 0x1234);
    std::assert_eq!(BigEndianHandler.decode_u32([0x12, 0x34, 0x56, 0x78]), 0x12345678);
}
