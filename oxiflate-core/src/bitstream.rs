//! Bit-level reading over an in-memory DEFLATE stream.
//!
//! # Bit Ordering
//!
//! DEFLATE packs data elements LSB-first: the first bit of the stream is the
//! least significant bit of the first byte. Fixed-width fields read with
//! [`BitReader::read_bits`] therefore come out in their natural numeric order,
//! while Huffman codes appear bit-reversed (first code bit in the lowest
//! position) and must be matched against tables indexed the same way.
//!
//! # End of Input
//!
//! Once the input slice is exhausted, refilling synthesizes zero bytes
//! instead of reading past the end. Those padding bytes may be *peeked*
//! (a Huffman lookup near the end of a stream peeks more bits than the final
//! code needs), but never *consumed*: consuming a padding bit means the
//! stream was truncated.
//!
//! # Example
//!
//! ```
//! use oxiflate_core::bitstream::BitReader;
//!
//! let data = [0b1010_1101, 0xFF];
//! let mut reader = BitReader::new(&data);
//!
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(5).unwrap(), 0b10101);
//! assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
//! assert!(reader.read_bits(1).is_err());
//! ```

use crate::error::{InflateError, Result};

/// Width of the bit accumulator.
const MAX_BITS_LEFT: u8 = 64;

/// Bits guaranteed to be buffered after a refill. A further whole byte would
/// not fit once this many bits are present.
const CONSUMABLE_BITS: u8 = MAX_BITS_LEFT - 7;

/// An LSB-first bit cursor over a byte slice.
///
/// `BitReader` is a plain value: it borrows the input, owns a 64-bit
/// accumulator, and tracks how many of the buffered bytes are synthesized
/// zero padding.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Complete input stream.
    input: &'a [u8],
    /// Offset of the next byte not yet loaded into the accumulator.
    next: usize,
    /// Bit accumulator (LSB-first).
    buffer: u64,
    /// Number of buffered bits, real and padding.
    bits_left: u8,
    /// Number of zero bytes synthesized past the end of input.
    ///
    /// Invariant: `padding_bytes * 8 <= bits_left`, so at most 8.
    padding_bytes: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new `BitReader` positioned at the first bit of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            next: 0,
            buffer: 0,
            bits_left: 0,
            padding_bytes: 0,
        }
    }

    /// Top up the accumulator to at least 57 bits.
    ///
    /// Past the end of input, zero bytes are synthesized and counted as
    /// padding.
    #[inline]
    pub fn refill(&mut self) {
        while self.bits_left < CONSUMABLE_BITS {
            match self.input.get(self.next) {
                Some(&byte) => {
                    self.buffer |= (byte as u64) << self.bits_left;
                    self.next += 1;
                }
                None => self.padding_bytes += 1,
            }
            self.bits_left += 8;
        }
    }

    /// Number of real (non-padding) bits that can still be consumed.
    #[inline]
    pub fn available_bits(&self) -> u64 {
        let buffered = (self.bits_left - self.padding_bytes * 8) as u64;
        buffered + ((self.input.len() - self.next) as u64) * 8
    }

    /// Current position in the stream, in bits from the start of input.
    pub fn bit_position(&self) -> u64 {
        let buffered_real = (self.bits_left - self.padding_bytes * 8) as u64;
        (self.next as u64) * 8 - buffered_real
    }

    /// Number of input bytes touched so far, counting a partial byte as whole.
    pub fn bytes_consumed(&self) -> usize {
        self.bit_position().div_ceil(8) as usize
    }

    /// Peek at up to 32 bits without consuming them.
    ///
    /// Never fails: bits past the end of input read as zero.
    #[inline]
    pub fn peek_bits(&mut self, count: u8) -> u32 {
        debug_assert!(count <= 32, "Cannot peek more than 32 bits at once");

        if self.bits_left < count {
            self.refill();
        }

        let mask = (1u64 << count).wrapping_sub(1);
        (self.buffer & mask) as u32
    }

    /// Consume `count` bits (at most 32).
    ///
    /// Fails with [`InflateError::TruncatedStream`] if fewer than `count` real
    /// bits remain; the cursor is left unchanged in that case.
    #[inline]
    pub fn consume_bits(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "Cannot consume more than 32 bits at once");

        if self.bits_left < count {
            self.refill();
        }

        let real = self.bits_left - self.padding_bytes * 8;
        if count > real {
            return Err(InflateError::truncated(
                self.bit_position(),
                (count - real) as u64,
            ));
        }

        self.buffer >>= count;
        self.bits_left -= count;
        Ok(())
    }

    /// Read up to 32 bits, first bit in the LSB position.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        let value = self.peek_bits(count);
        self.consume_bits(count)?;
        Ok(value)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Discard bits up to the next byte boundary.
    ///
    /// Whole bytes still sitting in the accumulator are handed back to the
    /// byte cursor, so the next [`read_bytes`](Self::read_bytes) starts at
    /// the first unread input byte. The accumulator is left empty.
    pub fn align_to_byte(&mut self) {
        let partial = self.bits_left % 8;
        self.buffer >>= partial;
        self.bits_left -= partial;

        let buffered_bytes = self.bits_left / 8;
        debug_assert!(self.padding_bytes <= buffered_bytes);
        self.next -= (buffered_bytes - self.padding_bytes) as usize;

        self.buffer = 0;
        self.bits_left = 0;
        self.padding_bytes = 0;
    }

    /// Borrow the next `count` bytes of input directly.
    ///
    /// Aligns to a byte boundary first.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.bits_left > 0 {
            self.align_to_byte();
        }

        let remaining = self.input.len() - self.next;
        if count > remaining {
            return Err(InflateError::truncated(
                self.bit_position(),
                ((count - remaining) as u64) * 8,
            ));
        }

        let bytes = &self.input[self.next..self.next + count];
        self.next += count;
        Ok(bytes)
    }

    /// Read a little-endian `u16`, aligning to a byte boundary first.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = [0xB5];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(1).unwrap(), 1); // LSB first
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = [0xFF, 0x00];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert_eq!(reader.read_bits(8).unwrap(), 0x0F); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_bitreader_peek() {
        let data = [0xAB];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.peek_bits(4), 0xB);
        assert_eq!(reader.peek_bits(4), 0xB); // Same value
        assert_eq!(reader.read_bits(4).unwrap(), 0xB); // Now consume
        assert_eq!(reader.peek_bits(4), 0xA);
    }

    #[test]
    fn test_peek_past_end_reads_zero_padding() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.peek_bits(16), 0x00FF);
        assert_eq!(reader.available_bits(), 8);
    }

    #[test]
    fn test_consume_padding_is_truncation() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);

        reader.read_bits(5).unwrap();
        let err = reader.read_bits(4).unwrap_err();
        assert_eq!(err, InflateError::truncated(5, 1));

        // The failed read leaves the cursor untouched.
        assert_eq!(reader.bit_position(), 5);
        assert_eq!(reader.read_bits(3).unwrap(), 0b111);
    }

    #[test]
    fn test_empty_input() {
        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.available_bits(), 0);
        assert!(matches!(
            reader.read_bit(),
            Err(InflateError::TruncatedStream { bit_position: 0, .. })
        ));
    }

    #[test]
    fn test_bit_position() {
        let data = [0u8; 16];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.bit_position(), 0);
        reader.read_bits(3).unwrap();
        assert_eq!(reader.bit_position(), 3);
        reader.read_bits(32).unwrap();
        assert_eq!(reader.bit_position(), 35);
        assert_eq!(reader.bytes_consumed(), 5);
        assert_eq!(reader.available_bits(), 128 - 35);
    }

    #[test]
    fn test_align_to_byte() {
        let data = [0xFF, 0xAA];
        let mut reader = BitReader::new(&data);

        reader.read_bits(3).unwrap(); // Read 3 bits
        reader.align_to_byte(); // Skip remaining 5 bits
        assert_eq!(reader.bit_position(), 8);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAA);
    }

    #[test]
    fn test_align_returns_buffered_bytes() {
        // The first read pulls all of these bytes into the accumulator;
        // alignment must hand the unread ones back to the byte cursor.
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x9A];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(3).unwrap(), 0b001);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u16_le().unwrap(), 0x5678);
        assert_eq!(reader.read_bytes(1).unwrap(), &[0x9A]);
        assert!(reader.read_bytes(1).is_err());
    }

    #[test]
    fn test_align_on_boundary_is_noop() {
        let data = [0x12, 0x34];
        let mut reader = BitReader::new(&data);

        reader.read_bits(8).unwrap();
        reader.align_to_byte();
        assert_eq!(reader.bit_position(), 8);
        assert_eq!(reader.read_bytes(1).unwrap(), &[0x34]);
    }

    #[test]
    fn test_read_bytes_truncated() {
        let data = [0x00, 0x01, 0x02];
        let mut reader = BitReader::new(&data);

        reader.read_bits(1).unwrap();
        let err = reader.read_bytes(4).unwrap_err();
        assert_eq!(err, InflateError::truncated(8, 16));
    }

    #[test]
    fn test_bits_resume_after_read_bytes() {
        let data = [0x00, 0xAB, 0b0000_0110];
        let mut reader = BitReader::new(&data);

        reader.read_bits(2).unwrap();
        assert_eq!(reader.read_bytes(1).unwrap(), &[0xAB]);
        assert_eq!(reader.read_bits(3).unwrap(), 0b110);
    }
}
