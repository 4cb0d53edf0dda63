//! # OxiFlate Core
//!
//! Core components for the OxiFlate decompressor.
//!
//! This crate provides the building blocks the DEFLATE decoder is layered on:
//!
//! - [`bitstream`]: LSB-first bit cursor over an in-memory stream
//! - [`output`]: Growable output buffer with LZ77 back-reference copy
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: CLI                                                 │
//! │     oxiflate binary                                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Huffman tables, block decoders, orchestrator        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader, OutputBuffer, InflateError               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiflate_core::{BitReader, OutputBuffer};
//!
//! let data = [0xAB, 0xCD];
//! let mut reader = BitReader::new(&data);
//! let bits = reader.read_bits(12).unwrap();
//! assert_eq!(bits, 0xDAB);
//!
//! let mut out = OutputBuffer::new(usize::MAX);
//! out.write_literals(b"ab").unwrap();
//! out.copy_match(2, 4).unwrap();
//! assert_eq!(out.output(), b"ababab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod output;

// Re-exports for convenience
pub use bitstream::BitReader;
pub use error::{ErrorKind, InflateError, Result};
pub use output::OutputBuffer;
