//! Growable output buffer for LZ77 decompression.
//!
//! DEFLATE back-references reach at most 32 KB back, but since the whole
//! decompressed stream is returned to the caller anyway, the output vector
//! doubles as the history window. No separate ring buffer is kept.

use crate::error::{InflateError, Result};

/// An append-only output buffer with a size limit.
///
/// The buffer may wrap a vector that already holds caller data. Bytes before
/// the starting length are never visible to back-references and are never
/// counted against the limit.
#[derive(Debug)]
pub struct OutputBuffer {
    /// Accumulated output, possibly preceded by caller data.
    data: Vec<u8>,
    /// Length of `data` when this stream started.
    start: usize,
    /// Maximum number of bytes this stream may produce.
    limit: usize,
}

impl OutputBuffer {
    /// Create an empty output buffer.
    pub fn new(limit: usize) -> Self {
        Self::with_capacity(0, limit)
    }

    /// Create an empty output buffer with a capacity hint.
    ///
    /// The hint is clamped to the limit.
    pub fn with_capacity(capacity: usize, limit: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.min(limit)),
            start: 0,
            limit,
        }
    }

    /// Append to an existing vector.
    pub fn from_vec(data: Vec<u8>, limit: usize) -> Self {
        let start = data.len();
        Self { data, start, limit }
    }

    /// Number of bytes produced by this stream.
    pub fn len(&self) -> usize {
        self.data.len() - self.start
    }

    /// Check if this stream has produced no bytes yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured output limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes produced by this stream.
    pub fn output(&self) -> &[u8] {
        &self.data[self.start..]
    }

    /// Fail if the output currently exceeds the limit.
    pub fn check_limit(&self) -> Result<()> {
        if self.len() > self.limit {
            return Err(InflateError::output_limit(self.limit, self.len()));
        }
        Ok(())
    }

    /// Fail if `additional` more bytes would exceed the limit.
    #[inline]
    fn ensure_room(&self, additional: usize) -> Result<()> {
        let produced = self.len().saturating_add(additional);
        if produced > self.limit {
            return Err(InflateError::output_limit(self.limit, produced));
        }
        Ok(())
    }

    /// Write a literal byte.
    #[inline]
    pub fn write_literal(&mut self, byte: u8) -> Result<()> {
        self.ensure_room(1)?;
        self.data.push(byte);
        Ok(())
    }

    /// Write multiple literal bytes.
    pub fn write_literals(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Copy `length` bytes starting `distance` bytes back.
    ///
    /// Overlapping copies (`distance < length`) replicate the pattern: each
    /// byte is read only after the bytes before it in the same copy have been
    /// appended.
    ///
    /// A distance beyond this stream's output yields
    /// [`InflateError::DistanceTooFar`] with a zero bit position; the caller
    /// stamps the real one.
    pub fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance == 0 || distance > self.len() {
            return Err(InflateError::distance_too_far(distance, self.len(), 0));
        }
        self.ensure_room(length)?;

        let src = self.data.len() - distance;
        if length <= distance {
            self.data.extend_from_within(src..src + length);
        } else {
            self.data.reserve(length);
            for i in 0..length {
                let byte = self.data[src + i];
                self.data.push(byte);
            }
        }

        Ok(())
    }

    /// Drop everything this stream produced.
    pub fn discard(&mut self) {
        self.data.truncate(self.start);
    }

    /// Take ownership of the underlying vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
