//! Helpers for assembling DEFLATE streams bit by bit.

#![allow(dead_code)]

use oxiflate::tables::{
    CODE_LENGTH_ORDER, DISTANCE_BASE, DISTANCE_EXTRA_BITS, LENGTH_BASE, LENGTH_EXTRA_BITS,
};

/// An LSB-first bit writer over a byte vector.
#[derive(Debug, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    buffer: u64,
    bits_in_buffer: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_bytes(&mut self) {
        while self.bits_in_buffer >= 8 {
            self.out.push((self.buffer & 0xFF) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }
    }

    /// Write a fixed-width field, LSB-first.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        assert!(count <= 32);
        if count == 0 {
            return;
        }
        let mask = (1u64 << count) - 1;
        self.buffer |= (value as u64 & mask) << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.flush_bytes();
    }

    /// Write a Huffman code, most significant code bit first.
    pub fn write_code(&mut self, code: u16, len: u8) {
        for i in (0..len).rev() {
            self.write_bits(((code >> i) & 1) as u32, 1);
        }
    }

    /// Pad with zeros to the next byte boundary.
    pub fn align(&mut self) {
        let partial = self.bits_in_buffer % 8;
        if partial > 0 {
            self.write_bits(0, 8 - partial);
        }
    }

    /// Write whole bytes. The writer must be byte aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        assert_eq!(self.bits_in_buffer, 0, "write_bytes requires alignment");
        self.out.extend_from_slice(bytes);
    }

    /// Pad to a byte boundary and return the stream.
    pub fn finish(mut self) -> Vec<u8> {
        self.align();
        self.out
    }
}

pub const STORED: u32 = 0b00;
pub const FIXED: u32 = 0b01;
pub const DYNAMIC: u32 = 0b10;

pub fn write_block_header(w: &mut BitWriter, bfinal: bool, btype: u32) {
    w.write_bits(bfinal as u32, 1);
    w.write_bits(btype, 2);
}

/// Write a complete stored block.
pub fn write_stored_block(w: &mut BitWriter, data: &[u8], bfinal: bool) {
    assert!(data.len() <= 0xFFFF);
    write_block_header(w, bfinal, STORED);
    w.align();
    let len = data.len() as u16;
    w.write_bytes(&len.to_le_bytes());
    w.write_bytes(&(!len).to_le_bytes());
    w.write_bytes(data);
}

/// Encode `data` as a sequence of maximal stored blocks.
pub fn stored_stream(data: &[u8]) -> Vec<u8> {
    let mut w = BitWriter::new();
    if data.is_empty() {
        write_stored_block(&mut w, data, true);
        return w.finish();
    }
    let chunks: Vec<&[u8]> = data.chunks(0xFFFF).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        write_stored_block(&mut w, chunk, i + 1 == chunks.len());
    }
    w.finish()
}

/// Canonical codes for a list of code lengths (RFC 1951 Section 3.2.2).
pub fn canonical_codes(lengths: &[u8]) -> Vec<(u16, u8)> {
    let mut bl_count = [0u16; 16];
    for &len in lengths {
        if len > 0 {
            bl_count[len as usize] += 1;
        }
    }
    let mut next_code = [0u16; 16];
    let mut code = 0u16;
    for bits in 1..16 {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }
    lengths
        .iter()
        .map(|&len| {
            if len == 0 {
                return (0, 0);
            }
            let code = next_code[len as usize];
            next_code[len as usize] += 1;
            (code, len)
        })
        .collect()
}

/// Fixed Huffman code for a literal/length symbol.
pub fn fixed_litlen_code(symbol: u16) -> (u16, u8) {
    match symbol {
        0..=143 => (0b0011_0000 + symbol, 8),
        144..=255 => (0b1_1001_0000 + (symbol - 144), 9),
        256..=279 => (symbol - 256, 7),
        _ => (0b1100_0000 + (symbol - 280), 8),
    }
}

/// Convert a length value (3-258) to (code, extra bits, extra value).
pub fn length_to_code(length: u16) -> (u16, u8, u16) {
    assert!((3..=258).contains(&length));
    let index = LENGTH_BASE.iter().rposition(|&base| base <= length).unwrap();
    let extra_value = length - LENGTH_BASE[index];
    (257 + index as u16, LENGTH_EXTRA_BITS[index], extra_value)
}

/// Convert a distance value (1-32768) to (code, extra bits, extra value).
pub fn distance_to_code(distance: u16) -> (u16, u8, u16) {
    assert!((1..=32768).contains(&distance));
    let index = DISTANCE_BASE
        .iter()
        .rposition(|&base| base <= distance)
        .unwrap();
    let extra_value = distance - DISTANCE_BASE[index];
    (index as u16, DISTANCE_EXTRA_BITS[index], extra_value)
}

pub fn write_fixed_symbol(w: &mut BitWriter, symbol: u16) {
    let (code, len) = fixed_litlen_code(symbol);
    w.write_code(code, len);
}

pub fn write_fixed_literals(w: &mut BitWriter, bytes: &[u8]) {
    for &byte in bytes {
        write_fixed_symbol(w, byte as u16);
    }
}

/// Write a length/distance pair with fixed Huffman codes.
pub fn write_fixed_match(w: &mut BitWriter, length: u16, distance: u16) {
    let (code, extra_bits, extra) = length_to_code(length);
    write_fixed_symbol(w, code);
    w.write_bits(extra as u32, extra_bits);

    let (dist_code, dist_extra_bits, dist_extra) = distance_to_code(distance);
    w.write_code(dist_code, 5);
    w.write_bits(dist_extra as u32, dist_extra_bits);
}

pub fn write_fixed_eob(w: &mut BitWriter) {
    write_fixed_symbol(w, 256);
}

/// Write a dynamic block header.
///
/// `tokens` are code length alphabet symbols with their extra-bit values,
/// encoded with canonical codes derived from `cl_lengths`.
pub fn write_dynamic_header(
    w: &mut BitWriter,
    hlit: usize,
    hdist: usize,
    cl_lengths: &[u8; 19],
    tokens: &[(u16, u32)],
) {
    let hclen = CODE_LENGTH_ORDER
        .iter()
        .rposition(|&symbol| cl_lengths[symbol] != 0)
        .map_or(4, |i| (i + 1).max(4));

    w.write_bits((hlit - 257) as u32, 5);
    w.write_bits((hdist - 1) as u32, 5);
    w.write_bits((hclen - 4) as u32, 4);
    for &symbol in &CODE_LENGTH_ORDER[..hclen] {
        w.write_bits(cl_lengths[symbol] as u32, 3);
    }

    let codes = canonical_codes(cl_lengths);
    for &(symbol, extra) in tokens {
        let (code, len) = codes[symbol as usize];
        assert!(len > 0, "code length symbol {symbol} has no code");
        w.write_code(code, len);
        match symbol {
            16 => w.write_bits(extra, 2),
            17 => w.write_bits(extra, 3),
            18 => w.write_bits(extra, 7),
            _ => {}
        }
    }
}

/// Deterministic pseudo-random bytes (linear congruential generator).
pub fn pseudo_random(size: usize, mut seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

/// Text-like data with a skewed byte distribution.
pub fn text_like(size: usize) -> Vec<u8> {
    const WORDS: &[&str] = &[
        "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "deflate", "huffman",
        "window", "symbol", "length", "distance", "block", "stream", "\n",
    ];
    let mut data = Vec::with_capacity(size);
    let mut seed = 0x9E37_79B9_7F4A_7C15u64;
    while data.len() < size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let word = WORDS[(seed >> 33) as usize % WORDS.len()];
        data.extend_from_slice(word.as_bytes());
        data.push(b' ');
    }
    data.truncate(size);
    data
}
