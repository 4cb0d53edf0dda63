//! DEFLATE decompression (inflate).
//!
//! This module implements the DEFLATE decompression algorithm as specified
//! in RFC 1951. It supports all three block types:
//! - Type 0: Stored (uncompressed)
//! - Type 1: Fixed Huffman codes
//! - Type 2: Dynamic Huffman codes
//!
//! Input is a complete raw DEFLATE stream in memory (no zlib or gzip
//! framing). Blocks are decoded in order until the block flagged final; any
//! bytes after it are left for the caller.

use crate::config::InflateConfig;
use crate::huffman::{
    CODELEN_ALPHABET_SIZE, END_OF_BLOCK, HuffmanTable, MAX_CODE_LENGTH, MAX_CODELEN_CODE_LENGTH,
};
use crate::tables::{
    CODE_LENGTH_ORDER, distance_params, fixed_distance_table, fixed_litlen_table, length_params,
};
use oxiflate_core::error::{InflateError, Result};
use oxiflate_core::{BitReader, OutputBuffer};
use std::fmt;
use tracing::{debug, trace};

/// Encoding of a DEFLATE block body (the BTYPE header field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// BTYPE 00: raw bytes, byte aligned.
    Stored,
    /// BTYPE 01: Huffman codes fixed by the format.
    FixedHuffman,
    /// BTYPE 10: Huffman codes transmitted in the block header.
    DynamicHuffman,
}

impl BlockType {
    /// Parse the 2-bit BTYPE field. The reserved value 11 yields `None`.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0b00 => Some(Self::Stored),
            0b01 => Some(Self::FixedHuffman),
            0b10 => Some(Self::DynamicHuffman),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => write!(f, "stored"),
            Self::FixedHuffman => write!(f, "fixed"),
            Self::DynamicHuffman => write!(f, "dynamic"),
        }
    }
}

/// Number of blocks of each type in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockCounts {
    /// Stored blocks.
    pub stored: usize,
    /// Fixed Huffman blocks.
    pub fixed: usize,
    /// Dynamic Huffman blocks.
    pub dynamic: usize,
}

impl BlockCounts {
    /// Total number of blocks.
    pub fn total(&self) -> usize {
        self.stored + self.fixed + self.dynamic
    }

    fn record(&mut self, block_type: BlockType) {
        match block_type {
            BlockType::Stored => self.stored += 1,
            BlockType::FixedHuffman => self.fixed += 1,
            BlockType::DynamicHuffman => self.dynamic += 1,
        }
    }
}

/// Statistics for one decompressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InflateSummary {
    /// Input bytes occupied by the stream, including the final partial byte.
    pub input_bytes: usize,
    /// Decompressed bytes produced.
    pub output_bytes: usize,
    /// Blocks decoded, by type.
    pub blocks: BlockCounts,
}

impl InflateSummary {
    /// Output size divided by input size; 0 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

/// DEFLATE decompressor.
///
/// An `Inflater` holds only configuration; every call decodes an
/// independent stream, so one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inflater {
    config: InflateConfig,
}

impl Inflater {
    /// Create a new DEFLATE decompressor.
    pub fn new(config: InflateConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &InflateConfig {
        &self.config
    }

    /// Decompress a raw DEFLATE stream.
    pub fn inflate(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (output, _) = self.inflate_with_summary(input)?;
        Ok(output)
    }

    /// Decompress a raw DEFLATE stream and report statistics.
    pub fn inflate_with_summary(&self, input: &[u8]) -> Result<(Vec<u8>, InflateSummary)> {
        let output = OutputBuffer::with_capacity(
            self.config.capacity_for(input.len()),
            self.config.max_output_size,
        );
        let mut stream = InflateStream::new(input, output);
        let summary = stream.run()?;
        Ok((stream.output.into_vec(), summary))
    }

    /// Decompress a raw DEFLATE stream, appending to `sink`.
    ///
    /// Back-references can only reach bytes produced by this stream, and the
    /// output limit applies to those bytes alone. On error `sink` is restored
    /// to its original contents.
    pub fn inflate_into(&self, input: &[u8], sink: &mut Vec<u8>) -> Result<InflateSummary> {
        let mut data = std::mem::take(sink);
        data.reserve(self.config.capacity_for(input.len()));

        let output = OutputBuffer::from_vec(data, self.config.max_output_size);
        let mut stream = InflateStream::new(input, output);
        let result = stream.run();
        if result.is_err() {
            stream.output.discard();
        }

        *sink = stream.output.into_vec();
        result
    }
}

/// State of one decode call.
struct InflateStream<'a> {
    reader: BitReader<'a>,
    output: OutputBuffer,
    blocks: BlockCounts,
}

impl<'a> InflateStream<'a> {
    fn new(input: &'a [u8], output: OutputBuffer) -> Self {
        Self {
            reader: BitReader::new(input),
            output,
            blocks: BlockCounts::default(),
        }
    }

    /// Decode blocks until the final one completes.
    fn run(&mut self) -> Result<InflateSummary> {
        loop {
            let final_block = self.inflate_block()?;
            if final_block {
                break;
            }
        }

        let summary = InflateSummary {
            input_bytes: self.reader.bytes_consumed(),
            output_bytes: self.output.len(),
            blocks: self.blocks,
        };
        debug!(
            input_bytes = summary.input_bytes,
            output_bytes = summary.output_bytes,
            blocks = summary.blocks.total(),
            "inflated stream"
        );
        Ok(summary)
    }

    /// Decompress a single block. Returns the BFINAL flag.
    fn inflate_block(&mut self) -> Result<bool> {
        // Read block header
        let header_position = self.reader.bit_position();
        let bfinal = self.reader.read_bit()?;
        let btype = self.reader.read_bits(2)?;

        let block_type = BlockType::from_bits(btype).ok_or_else(|| {
            InflateError::corrupt_header(header_position / 8, "reserved block type 3")
        })?;

        match block_type {
            BlockType::Stored => self.inflate_stored()?,
            BlockType::FixedHuffman => self.inflate_fixed()?,
            BlockType::DynamicHuffman => self.inflate_dynamic()?,
        }

        self.output.check_limit()?;
        debug!(
            block = self.blocks.total(),
            %block_type,
            bfinal,
            output_len = self.output.len(),
            "inflated block"
        );
        self.blocks.record(block_type);

        Ok(bfinal)
    }

    /// Decompress a stored (uncompressed) block.
    fn inflate_stored(&mut self) -> Result<()> {
        // Align to byte boundary
        self.reader.align_to_byte();
        let offset = self.reader.bit_position() / 8;

        // Read LEN and NLEN
        let len = self.reader.read_u16_le()?;
        let nlen = self.reader.read_u16_le()?;

        // Validate
        if nlen != !len {
            return Err(InflateError::corrupt_header(
                offset,
                format!("stored block LEN {len:#06x} does not complement NLEN {nlen:#06x}"),
            ));
        }

        // Copy bytes
        let bytes = self.reader.read_bytes(len as usize)?;
        self.output.write_literals(bytes)
    }

    /// Decompress a block with fixed Huffman codes.
    fn inflate_fixed(&mut self) -> Result<()> {
        self.inflate_huffman(fixed_litlen_table(), fixed_distance_table())
    }

    /// Decompress a block with dynamic Huffman codes.
    fn inflate_dynamic(&mut self) -> Result<()> {
        // Read code counts
        let hlit = self.reader.read_bits(5)? as usize + 257; // literal/length codes
        let hdist = self.reader.read_bits(5)? as usize + 1; // distance codes
        let hclen = self.reader.read_bits(4)? as usize + 4; // code length codes
        trace!(hlit, hdist, hclen, "dynamic block header");

        // Read code length code lengths
        let mut code_length_lengths = [0u8; CODELEN_ALPHABET_SIZE];
        for &symbol in &CODE_LENGTH_ORDER[..hclen] {
            code_length_lengths[symbol] = self.reader.read_bits(3)? as u8;
        }

        // Build code length table
        let position = self.reader.bit_position();
        let code_length_table =
            HuffmanTable::from_code_lengths(&code_length_lengths, MAX_CODELEN_CODE_LENGTH)
                .map_err(|err| err.at_bit(position))?;

        // Read literal/length and distance code lengths
        let all_lengths = self.read_code_lengths(&code_length_table, hlit + hdist)?;
        let (litlen_lengths, dist_lengths) = all_lengths.split_at(hlit);

        // Build tables
        let position = self.reader.bit_position();
        let litlen_table = HuffmanTable::from_code_lengths(litlen_lengths, MAX_CODE_LENGTH)
            .map_err(|err| err.at_bit(position))?;
        let dist_table = HuffmanTable::from_code_lengths(dist_lengths, MAX_CODE_LENGTH)
            .map_err(|err| err.at_bit(position))?;
        trace!(
            litlen_subtable = litlen_table.subtable_len(),
            dist_subtable = dist_table.subtable_len(),
            "built dynamic tables"
        );

        self.inflate_huffman(&litlen_table, &dist_table)
    }

    /// Decode `count` run-length encoded code lengths.
    fn read_code_lengths(&mut self, table: &HuffmanTable, count: usize) -> Result<Vec<u8>> {
        let mut lengths = Vec::with_capacity(count);

        while lengths.len() < count {
            let position = self.reader.bit_position();
            let symbol = table.decode(&mut self.reader)?;

            let (value, repeat) = match symbol {
                0..=15 => {
                    lengths.push(symbol as u8);
                    continue;
                }
                16 => {
                    // Copy previous length 3-6 times
                    let previous = lengths.last().copied().ok_or_else(|| {
                        InflateError::invalid_dynamic_header(
                            position,
                            "repeat code 16 with no previous length",
                        )
                    })?;
                    (previous, self.reader.read_bits(2)? as usize + 3)
                }
                // Repeat 0 for 3-10 times
                17 => (0, self.reader.read_bits(3)? as usize + 3),
                // Repeat 0 for 11-138 times
                18 => (0, self.reader.read_bits(7)? as usize + 11),
                _ => {
                    return Err(InflateError::invalid_huffman(
                        position,
                        format!("code length symbol {symbol} out of range"),
                    ));
                }
            };

            if lengths.len() + repeat > count {
                return Err(InflateError::invalid_dynamic_header(
                    position,
                    format!(
                        "repeat of {repeat} at index {} overruns {count} code lengths",
                        lengths.len()
                    ),
                ));
            }
            lengths.resize(lengths.len() + repeat, value);
        }

        Ok(lengths)
    }

    /// Decompress a block body using Huffman codes.
    fn inflate_huffman(&mut self, litlen: &HuffmanTable, dist: &HuffmanTable) -> Result<()> {
        loop {
            let position = self.reader.bit_position();
            let symbol = litlen.decode(&mut self.reader)?;

            if symbol < 256 {
                // Literal byte
                self.output.write_literal(symbol as u8)?;
            } else if symbol == END_OF_BLOCK {
                return Ok(());
            } else if let Some((base, extra_bits)) = length_params(symbol) {
                // Length code
                let length = base as usize + self.reader.read_bits(extra_bits)? as usize;

                // Read distance
                let dist_position = self.reader.bit_position();
                let dist_symbol = dist.decode(&mut self.reader)?;
                let (dist_base, dist_extra_bits) =
                    distance_params(dist_symbol).ok_or_else(|| {
                        InflateError::invalid_huffman(
                            dist_position,
                            format!("distance symbol {dist_symbol} out of range"),
                        )
                    })?;
                let distance =
                    dist_base as usize + self.reader.read_bits(dist_extra_bits)? as usize;

                // Copy from history
                let position = self.reader.bit_position();
                self.output
                    .copy_match(distance, length)
                    .map_err(|err| err.at_bit(position))?;
            } else {
                return Err(InflateError::invalid_huffman(
                    position,
                    format!("literal/length symbol {symbol} out of range"),
                ));
            }
        }
    }
}

/// Decompress a raw DEFLATE stream, producing at most `max_output_size` bytes.
pub fn decompress(input: &[u8], max_output_size: usize) -> Result<Vec<u8>> {
    Inflater::new(InflateConfig::new(max_output_size)).inflate(input)
}

/// Decompress a raw DEFLATE stream with the default configuration.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    Inflater::default().inflate(data)
}
