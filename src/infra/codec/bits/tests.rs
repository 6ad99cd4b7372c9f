//! Test suite for the MSB-first BitReader/BitWriter and range accessors.
use super::*;

#[test]
/// Sequential aligned reads across primitive widths.
fn test_read_aligned_bytes() {
    let data = [0x12, 0x34, 0x56, 0x78];
    let mut reader = BitReader::new(&data);
    assert_eq!(reader.read_u8(8).unwrap(), 0x12);
    assert_eq!(reader.read_u64(16).unwrap(), 0x3456);
    assert_eq!(reader.read_u8(8).unwrap(), 0x78);
}

#[test]
/// Non-aligned reads spanning a byte boundary, MSB-first.
fn test_read_non_aligned_bytes() {
    // stream: 1110 0000 0000 1100
    let data = [0b1110_0000, 0b0000_1100];
    let mut reader = BitReader::new(&data);
    reader.read_u64(2).unwrap(); // skip "11"
    assert_eq!(reader.read_u8(5).unwrap(), 0b10000);
    assert_eq!(reader.read_u8(5).unwrap(), 0b00000);
    assert_eq!(reader.read_u8(4).unwrap(), 0b1100);
}

#[test]
/// A full 64-bit read assembles bytes big-endian (bit 0 = stream MSB).
fn test_read_max() {
    let data = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    let mut reader = BitReader::new(&data);
    assert_eq!(reader.read_u64(64).unwrap(), 0x1122334455667788);
}

#[test]
/// Detects out-of-bounds reads.
fn test_read_out_of_bounds() {
    let data = [0xFF];
    let mut reader = BitReader::new(&data);
    assert!(reader.read_u8(8).is_ok());
    assert!(matches!(
        reader.read_u8(1),
        Err(BitReaderError::OutOfBounds {
            asked: 1,
            available: 0
        })
    ));
}

#[test]
/// Guard rails for maximum bit lengths per type.
fn test_read_num_bit_too_high() {
    let data = [0xFF; 16];
    let mut reader = BitReader::new(&data);
    assert!(matches!(
        reader.read_u8(9),
        Err(BitReaderError::TooLongForType { max: 8, asked: 9 })
    ));
    assert!(matches!(
        reader.read_u64(65),
        Err(BitReaderError::TooLongForType { max: 64, asked: 65 })
    ));
}

#[test]
/// Reading from an empty buffer must fail immediately.
fn test_read_empty_buffer() {
    let data: [u8; 0] = [];
    let mut reader = BitReader::new(&data);
    assert!(matches!(
        reader.read_u8(1),
        Err(BitReaderError::OutOfBounds {
            asked: 1,
            available: 0
        })
    ))
}

#[test]
/// Seek to an absolute position then read.
fn test_read_seek() {
    let data = [0xAA, 0x0F];
    let mut reader = BitReader::new(&data);
    reader.seek(12).unwrap();
    assert_eq!(reader.read_u8(4).unwrap(), 0xF);
    assert!(matches!(
        reader.seek(17),
        Err(BitReaderError::OutOfBounds {
            asked: 17,
            available: 16
        })
    ));
}

#[test]
/// Advance the cursor then perform a nominal read.
fn test_read_advance_cursor() {
    // 1111_1111 1010_1111
    let data: [u8; 2] = [0xFF, 0xAF];
    let mut reader = BitReader::new(&data);
    assert!(reader.advance(12).is_ok());
    assert_eq!(reader.read_u8(4).unwrap(), 0b1111);
}

#[test]
/// Extract a fully aligned slice, and refuse a misaligned one.
fn test_read_slice() {
    let data = [0xFF, 0xAF, 0xE2, 0xF1, 0xBC];
    let mut reader = BitReader::new(&data);
    assert_eq!(reader.read_slice(3).unwrap(), &[0xFF, 0xAF, 0xE2]);
    reader.seek(28).unwrap();
    assert!(matches!(
        reader.read_slice(1).unwrap_err(),
        BitReaderError::NonAlignedBit { cursor: 28 }
    ));
}

//==================================================================================TEST_BITWRITER

#[test]
/// Aligned write of a full byte.
fn test_write_aligned_bytes() {
    let mut buffer = [0xEF, 0xBE];
    let mut writer = BitWriter::new(&mut buffer);
    assert!(writer.write_u64(0xDE, 8).is_ok());
    assert_eq!(buffer, [0xDE, 0xBE]);
}

#[test]
/// Write a byte across a nibble offset; neighbors keep their bits.
fn test_write_non_aligned_bytes() {
    let mut buffer = [0xFF, 0xFF];
    let mut writer = BitWriter::new(&mut buffer);
    writer.seek(4).unwrap();
    assert!(writer.write_u64(0xAB, 8).is_ok());
    assert_eq!(buffer, [0xFA, 0xBF]);
}

#[test]
/// Write a single bit in the middle of the buffer.
fn test_write_min() {
    let mut buffer = [0b0000_0000];
    let mut writer = BitWriter::new(&mut buffer);
    writer.seek(3).unwrap();
    assert!(writer.write_u8(1, 1).is_ok());
    assert_eq!(buffer, [0b0001_0000]);
}

#[test]
/// Round-trip: what the writer lays down, the reader gets back.
fn test_write_then_read() {
    let mut buffer = [0u8; 4];
    let mut writer = BitWriter::new(&mut buffer);
    writer.write_u64(0b101, 3).unwrap();
    writer.write_u64(0x7FF, 11).unwrap();
    writer.write_u64(0x3FFFF & 0x2A5A5, 18).unwrap();
    let mut reader = BitReader::new(&buffer);
    assert_eq!(reader.read_u64(3).unwrap(), 0b101);
    assert_eq!(reader.read_u64(11).unwrap(), 0x7FF);
    assert_eq!(reader.read_u64(18).unwrap(), 0x3FFFF & 0x2A5A5);
}

#[test]
/// Writing past the buffer capacity must fail.
fn test_write_and_out() {
    let mut buffer = [0xFF; 3];
    let mut writer = BitWriter::new(&mut buffer);
    writer.seek(16).unwrap();
    assert!(matches!(
        writer.write_u64(0xDAFA, 16),
        Err(BitWriterError::OutOfBounds {
            asked: 16,
            available: 8
        })
    ));
}

#[test]
/// Copy an aligned slice and reject misaligned slice writes.
fn test_write_slice() {
    let slice = [0xDF, 0xCF, 0xE2];
    let mut buffer = [0x00; 5];
    {
        let mut writer = BitWriter::new(&mut buffer);
        assert!(writer.write_slice(&slice).is_ok());
        writer.seek(28).unwrap();
        assert!(matches!(
            writer.write_slice(&[0xAA]).unwrap_err(),
            BitWriterError::NonAlignedBit { cursor: 28 }
        ));
    }
    assert_eq!(&buffer[..3], &slice);
}

//==================================================================================TEST_RANGE_ACCESS

#[test]
/// Absolute range extraction, bit 0 = buffer MSB.
fn test_extract_range() {
    let data = [0b1011_0010];
    assert_eq!(
        extract_range(&data, &BitRange { start: 0, end: 2 }).unwrap(),
        0b101
    );
    assert_eq!(
        extract_range(&data, &BitRange { start: 3, end: 7 }).unwrap(),
        0b10010
    );
}

#[test]
/// Range extraction across byte boundaries.
fn test_extract_range_spanning() {
    let data = [0x12, 0x34, 0x56];
    assert_eq!(
        extract_range(&data, &BitRange { start: 4, end: 19 }).unwrap(),
        0x2345
    );
}

#[test]
/// Deposit then extract the same range.
fn test_deposit_range_roundtrip() {
    let mut buffer = [0u8; 3];
    let range = BitRange { start: 5, end: 17 };
    deposit_range(&mut buffer, &range, 0x1ABC & 0x1FFF).unwrap();
    assert_eq!(extract_range(&buffer, &range).unwrap(), 0x1ABC & 0x1FFF);
    // Neighboring bits stay untouched.
    assert_eq!(
        extract_range(&buffer, &BitRange { start: 0, end: 4 }).unwrap(),
        0
    );
}

#[test]
/// A range past the end of the buffer is rejected.
fn test_extract_range_out_of_bounds() {
    let data = [0xFF];
    assert!(extract_range(&data, &BitRange { start: 4, end: 8 }).is_err());
}
