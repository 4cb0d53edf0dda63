//! Error types for OxiFlate operations.
//!
//! Every error is fatal to the decode call that produced it. Variants carry
//! enough positional context (bit position, or byte offset for stored-block
//! headers) to locate the fault in the compressed input.

use thiserror::Error;

/// The error type for raw DEFLATE decompression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InflateError {
    /// Input bits ran out before a field, code, or stored byte run completed.
    #[error("Truncated stream at bit position {bit_position}: {needed} more bits required")]
    TruncatedStream {
        /// Bit position where the read was attempted.
        bit_position: u64,
        /// Number of bits that were requested but not present.
        needed: u64,
    },

    /// Reserved block type, or stored block LEN/NLEN mismatch.
    #[error("Corrupt block header at byte offset {offset}: {message}")]
    CorruptBlockHeader {
        /// Byte offset of the offending header field.
        offset: u64,
        /// Description of the fault.
        message: String,
    },

    /// Malformed code-length sequence in a dynamic Huffman header.
    #[error("Invalid dynamic header at bit position {bit_position}: {message}")]
    InvalidDynamicHeader {
        /// Bit position where the fault was detected.
        bit_position: u64,
        /// Description of the fault.
        message: String,
    },

    /// Oversubscribed code, unassigned bit pattern, or out-of-range symbol.
    #[error("Invalid Huffman code at bit position {bit_position}: {message}")]
    InvalidHuffmanCode {
        /// Bit position where the fault was detected.
        bit_position: u64,
        /// Description of the fault.
        message: String,
    },

    /// Back-reference reaching before the start of the output.
    #[error("Back-reference distance {distance} exceeds {available} bytes of output")]
    DistanceTooFar {
        /// The requested distance.
        distance: usize,
        /// Bytes produced so far by this stream.
        available: usize,
        /// Bit position just after the distance code.
        bit_position: u64,
    },

    /// Output grew beyond the caller-supplied bound.
    #[error("Output limit of {limit} bytes exceeded ({produced} bytes required)")]
    OutputLimitExceeded {
        /// Configured maximum output size.
        limit: usize,
        /// Output size that would have been reached.
        produced: usize,
    },
}

/// Category of an [`InflateError`], without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`InflateError::TruncatedStream`].
    TruncatedStream,
    /// See [`InflateError::CorruptBlockHeader`].
    CorruptBlockHeader,
    /// See [`InflateError::InvalidDynamicHeader`].
    InvalidDynamicHeader,
    /// See [`InflateError::InvalidHuffmanCode`].
    InvalidHuffmanCode,
    /// See [`InflateError::DistanceTooFar`].
    DistanceTooFar,
    /// See [`InflateError::OutputLimitExceeded`].
    OutputLimitExceeded,
}

/// Result type alias for OxiFlate operations.
pub type Result<T> = std::result::Result<T, InflateError>;

impl InflateError {
    /// Create a truncated stream error.
    pub fn truncated(bit_position: u64, needed: u64) -> Self {
        Self::TruncatedStream {
            bit_position,
            needed,
        }
    }

    /// Create a corrupt block header error.
    pub fn corrupt_header(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptBlockHeader {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid dynamic header error.
    pub fn invalid_dynamic_header(bit_position: u64, message: impl Into<String>) -> Self {
        Self::InvalidDynamicHeader {
            bit_position,
            message: message.into(),
        }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64, message: impl Into<String>) -> Self {
        Self::InvalidHuffmanCode {
            bit_position,
            message: message.into(),
        }
    }

    /// Create a distance too far error.
    pub fn distance_too_far(distance: usize, available: usize, bit_position: u64) -> Self {
        Self::DistanceTooFar {
            distance,
            available,
            bit_position,
        }
    }

    /// Create an output limit error.
    pub fn output_limit(limit: usize, produced: usize) -> Self {
        Self::OutputLimitExceeded { limit, produced }
    }

    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TruncatedStream { .. } => ErrorKind::TruncatedStream,
            Self::CorruptBlockHeader { .. } => ErrorKind::CorruptBlockHeader,
            Self::InvalidDynamicHeader { .. } => ErrorKind::InvalidDynamicHeader,
            Self::InvalidHuffmanCode { .. } => ErrorKind::InvalidHuffmanCode,
            Self::DistanceTooFar { .. } => ErrorKind::DistanceTooFar,
            Self::OutputLimitExceeded { .. } => ErrorKind::OutputLimitExceeded,
        }
    }

    /// Replace the bit position of a positional error.
    ///
    /// Table construction has no bit cursor; the block decoder stamps the
    /// position of the header the lengths came from.
    pub fn at_bit(mut self, position: u64) -> Self {
        match &mut self {
            Self::TruncatedStream { bit_position, .. }
            | Self::InvalidDynamicHeader { bit_position, .. }
            | Self::InvalidHuffmanCode { bit_position, .. }
            | Self::DistanceTooFar { bit_position, .. } => *bit_position = position,
            Self::CorruptBlockHeader { .. } | Self::OutputLimitExceeded { .. } => {}
        }
        self
    }
}
