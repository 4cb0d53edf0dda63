//! # OxiFlate
//!
//! Pure Rust decompressor for raw DEFLATE streams (RFC 1951).
//!
//! This crate turns a complete, in-memory DEFLATE stream into the original
//! bytes. It does not parse zlib or gzip framing; containers strip their own
//! headers and hand the raw stream over.
//!
//! ## Features
//!
//! - All DEFLATE block types
//!   - Stored (uncompressed) blocks
//!   - Fixed Huffman codes
//!   - Dynamic Huffman codes
//! - Two-level Huffman decode tables (9-bit primary table plus subtables)
//! - Strict rejection of malformed input, with bit positions in errors
//! - Output size limit against decompression bombs
//!
//! ## Example
//!
//! ```rust
//! use oxiflate::{decompress, inflate};
//!
//! // "hello world" with fixed Huffman codes
//! let compressed = [
//!     0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x57, 0x28, 0xCF, 0x2F, 0xCA, 0x49, 0x01, 0x00,
//! ];
//!
//! let decompressed = inflate(&compressed).unwrap();
//! assert_eq!(decompressed, b"hello world");
//!
//! // Refuse to produce more than 5 bytes
//! assert!(decompress(&compressed, 5).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod huffman;
pub mod inflate;
pub mod tables;

// Re-exports
pub use config::InflateConfig;
pub use huffman::{DecodeEntry, HuffmanTable};
pub use inflate::{BlockCounts, BlockType, InflateSummary, Inflater, decompress, inflate};
pub use oxiflate_core::{ErrorKind, InflateError, Result};
