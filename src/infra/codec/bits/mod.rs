//! Low-level components dedicated to bit manipulation for PDU buffers.
//! Radio PDUs count bit 0 as the most significant bit of the stream, so all
//! readers/writers here are MSB-first; fields seldom align with byte
//! boundaries and may even be split across non-contiguous ranges.
use crate::core::BitRange;
use crate::error::{BitReaderError, BitWriterError};

/// Generic reader that extracts MSB-first bit segments from a `&[u8]`
/// without extra allocation or copies.
pub struct BitReader<'a> {
    /// Shared source buffer (typically a received burst payload).
    buffer: &'a [u8],
    /// Current index expressed as number of bits consumed from bit 0.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at bit 0 of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Read `num_bits` bits starting at the current cursor and return them as
    /// a `u64` whose most significant read bit is the value's highest bit.
    /// `num_bits` must stay in the [1, 64] range.
    pub fn read_u64(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }

        let buffer_len_bits = self.buffer.len() * 8;
        let read_end_bit = self.bit_cursor + num_bits as usize;
        if read_end_bit > buffer_len_bits {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available: buffer_len_bits - self.bit_cursor,
            });
        }

        let mut result: u64 = 0;
        let mut bits_read: usize = 0;

        while bits_read < num_bits as usize {
            let byte_index = (self.bit_cursor + bits_read) / 8;
            let bit_offset = (self.bit_cursor + bits_read) % 8;

            let byte = self.buffer[byte_index];

            // Bits still available in the current byte, MSB side first.
            let take = (8 - bit_offset).min(num_bits as usize - bits_read);
            let shift = 8 - bit_offset - take;
            let mask = ((1u16 << take) - 1) as u8;
            let chunk = (byte >> shift) & mask;

            result = (result << take) | chunk as u64;
            bits_read += take;
        }

        self.bit_cursor += num_bits as usize;
        Ok(result)
    }

    /// Read up to 8 bits and return a `u8`.
    pub fn read_u8(&mut self, num_bits: u8) -> Result<u8, BitReaderError> {
        if num_bits > 8 {
            return Err(BitReaderError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|val| val as u8)
    }

    /// Move the cursor to an absolute bit position.
    pub fn seek(&mut self, bit: usize) -> Result<(), BitReaderError> {
        if bit > self.buffer.len() * 8 {
            return Err(BitReaderError::OutOfBounds {
                asked: bit,
                available: self.buffer.len() * 8,
            });
        }
        self.bit_cursor = bit;
        Ok(())
    }

    /// Advance the cursor by `length` bits without reading data.
    pub fn advance(&mut self, length: u8) -> Result<(), BitReaderError> {
        let buffer_len_bits = self.buffer.len() * 8;
        let new_cursor_pos = self.bit_cursor + length as usize;
        if new_cursor_pos > buffer_len_bits {
            return Err(BitReaderError::OutOfBounds {
                asked: length as usize,
                available: buffer_len_bits - self.bit_cursor,
            });
        }
        self.bit_cursor = new_cursor_pos;
        Ok(())
    }

    /// Return a slice of `len` bytes from the current position.
    /// Cursor must be aligned on an octet boundary.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], BitReaderError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitReaderError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        let byte_start = self.bit_cursor / 8;
        let byte_end = byte_start + len;
        if byte_end > self.buffer.len() {
            return Err(BitReaderError::OutOfBounds {
                asked: byte_end,
                available: self.buffer.len(),
            });
        }
        let slice = &self.buffer[byte_start..byte_end];
        self.bit_cursor += len * 8;
        Ok(slice)
    }
}

//==================================================================================BITWRITER

/// Generic writer able to lay MSB-first bit segments into a `&mut [u8]`
/// without assuming byte alignment. Used by the serialization layer to
/// rebuild PDU payloads field by field.
pub struct BitWriter<'a> {
    /// Target buffer (the PDU under construction).
    buffer: &'a mut [u8],
    /// Current position expressed in bits written.
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned at bit 0 of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Expose the cursor position in bits (useful to derive final length).
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Write the low `num_bits` bits of `value`, most significant bit first.
    pub fn write_u64(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }

        let buffer_len_bits = self.buffer.len() * 8;
        let write_end_bit = self.bit_cursor + num_bits as usize;
        if write_end_bit > buffer_len_bits {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available: buffer_len_bits - self.bit_cursor,
            });
        }

        let mut bits_written: usize = 0;
        while bits_written < num_bits as usize {
            let byte_index = (self.bit_cursor + bits_written) / 8;
            let bit_offset = (self.bit_cursor + bits_written) % 8;

            let remaining = num_bits as usize - bits_written;
            let take = (8 - bit_offset).min(remaining);
            // Chunk holding the highest still-unwritten bits of the value.
            let mask = ((1u16 << take) - 1) as u8;
            let chunk = (value >> (remaining - take)) as u8 & mask;

            let shift = 8 - bit_offset - take;
            self.buffer[byte_index] &= !(mask << shift);
            self.buffer[byte_index] |= chunk << shift;

            bits_written += take;
        }

        self.bit_cursor += num_bits as usize;
        Ok(())
    }

    /// Convenience helper to write up to 8 bits.
    pub fn write_u8(&mut self, value: u8, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 8 {
            return Err(BitWriterError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }

    /// Move the cursor to an absolute bit position.
    pub fn seek(&mut self, bit: usize) -> Result<(), BitWriterError> {
        if bit > self.buffer.len() * 8 {
            return Err(BitWriterError::OutOfBounds {
                asked: bit,
                available: self.buffer.len() * 8,
            });
        }
        self.bit_cursor = bit;
        Ok(())
    }

    /// Copy an already-aligned byte slice into the buffer.
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), BitWriterError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitWriterError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        let byte_start = self.bit_cursor / 8;
        let byte_end = byte_start + slice.len();
        if byte_end > self.buffer.len() {
            return Err(BitWriterError::OutOfBounds {
                asked: byte_end,
                available: self.buffer.len(),
            });
        }
        self.buffer[byte_start..byte_end].copy_from_slice(slice);
        self.bit_cursor += slice.len() * 8;
        Ok(())
    }
}

//==================================================================================RANGE_ACCESS

/// Extract an absolute inclusive bit range as a field-width unsigned integer.
pub fn extract_range(buffer: &[u8], range: &BitRange) -> Result<u64, BitReaderError> {
    let width = range.width();
    if width > 64 {
        return Err(BitReaderError::TooLongForType {
            max: 64,
            asked: width.min(255) as u8,
        });
    }
    let mut reader = BitReader::new(buffer);
    reader.seek(range.start as usize)?;
    reader.read_u64(width as u8)
}

/// Deposit the low `range.width()` bits of `value` into an absolute range.
pub fn deposit_range(
    buffer: &mut [u8],
    range: &BitRange,
    value: u64,
) -> Result<(), BitWriterError> {
    let width = range.width();
    if width > 64 {
        return Err(BitWriterError::TooLongForType {
            max: 64,
            asked: width.min(255) as u8,
        });
    }
    let mut writer = BitWriter::new(buffer);
    writer.seek(range.start as usize)?;
    writer.write_u64(value, width as u8)
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
