//! Canonical Huffman decoding for DEFLATE.
//!
//! DEFLATE uses canonical Huffman codes (RFC 1951 Section 3.2.2): the code
//! for every symbol is derived from the per-symbol code lengths alone. Codes
//! of the same length are consecutive integers, and shorter codes precede
//! longer ones numerically.
//!
//! # Alphabets
//!
//! DEFLATE uses three Huffman alphabets:
//! - **Literal/Length**: 0-287 (0-255 literals, 256 EOB, 257-285 lengths)
//! - **Distance**: 0-31 (only 0-29 are valid)
//! - **Code Length**: 0-18 (for encoding dynamic Huffman tables)
//!
//! # Table Layout
//!
//! A flat table indexed by 15 bits would hold 32768 entries. Instead, a
//! primary table is indexed by the first [`PRIMARY_BITS`] bits of the
//! stream. Codes no longer than that resolve directly to a leaf; longer codes
//! share a primary slot per prefix, which redirects to a subtable indexed by
//! the remaining bits.

use oxiflate_core::BitReader;
use oxiflate_core::error::{InflateError, Result};

/// Maximum code length for literal/length and distance codes.
pub const MAX_CODE_LENGTH: u8 = 15;

/// Maximum code length for the code length alphabet.
pub const MAX_CODELEN_CODE_LENGTH: u8 = 7;

/// Size of the literal/length alphabet, including the two unused symbols.
pub const LITLEN_ALPHABET_SIZE: usize = 288;

/// Number of valid distance symbols.
pub const DISTANCE_ALPHABET_SIZE: usize = 30;

/// Size of the code length alphabet (0-18).
pub const CODELEN_ALPHABET_SIZE: usize = 19;

/// End of block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// Index width of the primary decode table.
pub const PRIMARY_BITS: u8 = 9;

/// One slot of a decode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeEntry {
    /// No code maps to this bit pattern.
    #[default]
    Unassigned,
    /// The pattern decodes to `symbol` after consuming `length` bits.
    Leaf {
        /// Decoded symbol.
        symbol: u16,
        /// Bits to consume at this level.
        length: u8,
    },
    /// The pattern is the prefix of codes longer than the primary width.
    Subtable {
        /// First entry of the subtable.
        start: u32,
        /// Bits consumed by the prefix before indexing the subtable.
        prefix_bits: u8,
        /// Index width of the subtable.
        index_bits: u8,
    },
}

/// A two-level canonical Huffman decode table.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Primary table, indexed by the first `primary_bits` stream bits.
    primary: Vec<DecodeEntry>,
    /// Index width of the primary table.
    primary_bits: u8,
    /// All subtables, back to back.
    subtables: Vec<DecodeEntry>,
    /// Longest code length in this table; 0 if no symbol is used.
    max_code_length: u8,
}

impl HuffmanTable {
    /// A table with no codes. Every decode fails.
    fn empty() -> Self {
        Self {
            primary: vec![DecodeEntry::Unassigned],
            primary_bits: 0,
            subtables: Vec::new(),
            max_code_length: 0,
        }
    }

    /// Build a decode table from code lengths.
    ///
    /// # Arguments
    ///
    /// * `code_lengths` - Array where `code_lengths[i]` is the bit length for symbol `i`.
    ///   A length of 0 means the symbol is not used.
    /// * `max_bits` - Longest code length allowed for this alphabet.
    ///
    /// Incomplete codes are accepted; their unassigned bit patterns are
    /// rejected when decoded. Oversubscribed codes (violating the Kraft
    /// inequality) are rejected here with [`InflateError::InvalidHuffmanCode`].
    /// The error carries bit position 0; callers stamp the real position with
    /// [`InflateError::at_bit`].
    pub fn from_code_lengths(code_lengths: &[u8], max_bits: u8) -> Result<Self> {
        debug_assert!(max_bits <= MAX_CODE_LENGTH);

        // Count codes of each length
        let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut max_length = 0u8;

        for (symbol, &len) in code_lengths.iter().enumerate() {
            if len > max_bits {
                return Err(InflateError::invalid_huffman(
                    0,
                    format!("symbol {symbol} has code length {len}, maximum is {max_bits}"),
                ));
            }
            if len > 0 {
                bl_count[len as usize] += 1;
                max_length = max_length.max(len);
            }
        }

        if max_length == 0 {
            return Ok(Self::empty());
        }

        // Compute first code for each length (RFC 1951 algorithm)
        let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=max_length as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        // Assign codes in ascending symbol order
        let mut codes = vec![0u32; code_lengths.len()];
        for (symbol, &len) in code_lengths.iter().enumerate() {
            if len > 0 {
                codes[symbol] = next_code[len as usize];
                next_code[len as usize] += 1;
            }
        }

        // Kraft check: no length may run past its code space
        for bits in 1..=max_length as usize {
            if next_code[bits] > 1 << bits {
                return Err(InflateError::invalid_huffman(
                    0,
                    format!("oversubscribed Huffman code at length {bits}"),
                ));
            }
        }

        let primary_bits = PRIMARY_BITS.min(max_length);
        let primary_mask = (1usize << primary_bits) - 1;
        let mut primary = vec![DecodeEntry::Unassigned; 1 << primary_bits];

        // Fill leaves for short codes; record subtable widths for long ones
        let mut sub_widths = vec![0u8; 1 << primary_bits];
        for (symbol, &len) in code_lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let reversed = reverse_bits(codes[symbol] as u16, len) as usize;

            if len <= primary_bits {
                let entry = DecodeEntry::Leaf {
                    symbol: symbol as u16,
                    length: len,
                };
                let fill_count = 1usize << (primary_bits - len);
                for i in 0..fill_count {
                    primary[reversed | (i << len)] = entry;
                }
            } else {
                let prefix = reversed & primary_mask;
                sub_widths[prefix] = sub_widths[prefix].max(len - primary_bits);
            }
        }

        // Allocate subtables in prefix order
        let mut subtables = Vec::new();
        let mut sub_starts = vec![0usize; 1 << primary_bits];
        for (prefix, &width) in sub_widths.iter().enumerate() {
            if width == 0 {
                continue;
            }
            sub_starts[prefix] = subtables.len();
            primary[prefix] = DecodeEntry::Subtable {
                start: subtables.len() as u32,
                prefix_bits: primary_bits,
                index_bits: width,
            };
            subtables.resize(subtables.len() + (1 << width), DecodeEntry::Unassigned);
        }

        // Fill subtable leaves
        for (symbol, &len) in code_lengths.iter().enumerate() {
            if len <= primary_bits {
                continue;
            }
            let reversed = reverse_bits(codes[symbol] as u16, len) as usize;
            let prefix = reversed & primary_mask;
            let suffix = reversed >> primary_bits;
            let sub_len = len - primary_bits;

            let entry = DecodeEntry::Leaf {
                symbol: symbol as u16,
                length: sub_len,
            };
            let fill_count = 1usize << (sub_widths[prefix] - sub_len);
            for i in 0..fill_count {
                subtables[sub_starts[prefix] + (suffix | (i << sub_len))] = entry;
            }
        }

        Ok(Self {
            primary,
            primary_bits,
            subtables,
            max_code_length: max_length,
        })
    }

    /// Longest code length in this table.
    pub fn max_code_length(&self) -> u8 {
        self.max_code_length
    }

    /// Index width of the primary table.
    pub fn primary_bits(&self) -> u8 {
        self.primary_bits
    }

    /// Total number of subtable entries.
    pub fn subtable_len(&self) -> usize {
        self.subtables.len()
    }

    /// Check if the table has no codes at all.
    pub fn is_empty(&self) -> bool {
        self.max_code_length == 0
    }

    /// Decode a symbol from the bit stream.
    /// This is a hot path - inline for better performance.
    #[inline]
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        if self.is_empty() {
            return Err(InflateError::invalid_huffman(
                reader.bit_position(),
                "no codes defined for this alphabet",
            ));
        }

        let bits = reader.peek_bits(self.primary_bits) as usize;
        match self.primary[bits] {
            DecodeEntry::Leaf { symbol, length } => {
                reader.consume_bits(length)?;
                Ok(symbol)
            }
            DecodeEntry::Subtable {
                start,
                prefix_bits,
                index_bits,
            } => {
                reader.consume_bits(prefix_bits)?;
                let index = reader.peek_bits(index_bits) as usize;
                match self.subtables[start as usize + index] {
                    DecodeEntry::Leaf { symbol, length } => {
                        reader.consume_bits(length)?;
                        Ok(symbol)
                    }
                    _ => Err(Self::unassigned(reader, index_bits)),
                }
            }
            DecodeEntry::Unassigned => Err(Self::unassigned(reader, self.primary_bits)),
        }
    }

    /// Error for a lookup that hit an unassigned slot.
    ///
    /// If the lookup peeked past the end of input, the zero padding may be
    /// what selected the empty slot, so the stream is reported truncated.
    fn unassigned(reader: &BitReader<'_>, width: u8) -> InflateError {
        let position = reader.bit_position();
        let available = reader.available_bits();
        if available < width as u64 {
            InflateError::truncated(position, width as u64 - available)
        } else {
            InflateError::invalid_huffman(position, "bit pattern matches no assigned code")
        }
    }
}

/// Reverse the low `length` bits of a code.
fn reverse_bits(code: u16, length: u8) -> u16 {
    code.reverse_bits() >> (16 - length as u32)
}
