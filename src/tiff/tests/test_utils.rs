use std::io::Cursor;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian, WriteBytesExt};

/// Creates a little-endian TIFF with one IFD holding width and height
pub fn create_test_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II for little-endian
    buffer.write_u16::<LittleEndian>(42).unwrap();     // TIFF magic number
    buffer.write_u32::<LittleEndian>(8).unwrap();      // IFD offset

    // Sample IFD (at offset 8)
    buffer.write_u16::<LittleEndian>(2).unwrap();      // Entry count (2 entries)

    // Entry 1: ImageWidth (tag 256)
    buffer.write_u16::<LittleEndian>(256).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u32::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u32::<LittleEndian>(800).unwrap();    // Value (width)

    // Entry 2: ImageLength/Height (tag 257)
    buffer.write_u16::<LittleEndian>(257).unwrap();    // Tag
    buffer.write_u16::<LittleEndian>(4).unwrap();      // Type (LONG)
    buffer.write_u32::<LittleEndian>(1).unwrap();      // Count
    buffer.write_u32::<LittleEndian>(600).unwrap();    // Value (height)

    // Next IFD offset (0 = no more IFDs)
    buffer.write_u32::<LittleEndian>(0).unwrap();

    Cursor::new(buffer)
}

/// Creates a big-endian TIFF (as found in EXIF blocks) with SHORT
/// dimensions and a 300/1 inch resolution
pub fn create_big_endian_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<BigEndian>(0x4D4D).unwrap();    // MM for big-endian
    buffer.write_u16::<BigEndian>(42).unwrap();
    buffer.write_u32::<BigEndian>(8).unwrap();

    // IFD at offset 8: 2 + 4 * 12 + 4 = 54 bytes, value data follows at 62
    buffer.write_u16::<BigEndian>(4).unwrap();

    // ImageWidth as SHORT, left-justified in the value field
    buffer.write_u16::<BigEndian>(256).unwrap();
    buffer.write_u16::<BigEndian>(3).unwrap();
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer.write_u16::<BigEndian>(640).unwrap();
    buffer.write_u16::<BigEndian>(0).unwrap();

    // ImageLength as SHORT
    buffer.write_u16::<BigEndian>(257).unwrap();
    buffer.write_u16::<BigEndian>(3).unwrap();
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer.write_u16::<BigEndian>(480).unwrap();
    buffer.write_u16::<BigEndian>(0).unwrap();

    // XResolution RATIONAL at offset 62
    buffer.write_u16::<BigEndian>(282).unwrap();
    buffer.write_u16::<BigEndian>(5).unwrap();
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer.write_u32::<BigEndian>(62).unwrap();

    // ResolutionUnit = inch
    buffer.write_u16::<BigEndian>(296).unwrap();
    buffer.write_u16::<BigEndian>(3).unwrap();
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer.write_u16::<BigEndian>(2).unwrap();
    buffer.write_u16::<BigEndian>(0).unwrap();

    buffer.write_u32::<BigEndian>(0).unwrap();         // No next IFD

    let mut rational = [0u8; 8];
    BigEndian::write_u32(&mut rational[..4], 300);
    BigEndian::write_u32(&mut rational[4..], 1);
    buffer.extend_from_slice(&rational);

    Cursor::new(buffer)
}

/// Creates a BigTIFF header, which the reader must refuse
pub fn create_test_bigtiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II for little-endian
    buffer.write_u16::<LittleEndian>(43).unwrap();     // BigTIFF version
    buffer.write_u16::<LittleEndian>(8).unwrap();      // Offset size
    buffer.write_u16::<LittleEndian>(0).unwrap();      // Reserved
    buffer.write_u64::<LittleEndian>(16).unwrap();     // IFD offset

    Cursor::new(buffer)
}
