//! Decoder configuration.

/// Configuration for an [`Inflater`](crate::Inflater).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateConfig {
    /// Maximum number of bytes a single stream may decompress to.
    ///
    /// This is the guard against decompression bombs: a few hundred bytes of
    /// DEFLATE can legitimately expand to gigabytes.
    pub max_output_size: usize,
    /// Initial output capacity. `None` derives a hint from the input size.
    pub initial_capacity: Option<usize>,
}

impl InflateConfig {
    /// Default output limit (1 GiB).
    pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 1 << 30;

    /// Expansion factor used to guess output capacity from input size.
    const CAPACITY_RATIO: usize = 4;

    /// Default configuration.
    ///
    /// - 1 GiB output limit
    /// - Capacity guessed from input size
    pub const DEFAULT: Self = Self {
        max_output_size: Self::DEFAULT_MAX_OUTPUT_SIZE,
        initial_capacity: None,
    };

    /// No output limit. Only for trusted input.
    pub const UNLIMITED: Self = Self {
        max_output_size: usize::MAX,
        initial_capacity: None,
    };

    /// Create a configuration with the given output limit.
    pub fn new(max_output_size: usize) -> Self {
        Self {
            max_output_size,
            initial_capacity: None,
        }
    }

    /// Set the output limit.
    #[must_use]
    pub fn with_max_output_size(mut self, max_output_size: usize) -> Self {
        self.max_output_size = max_output_size;
        self
    }

    /// Set the initial output capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Output capacity to reserve for an input of `input_len` bytes.
    ///
    /// Never exceeds the output limit.
    pub fn capacity_for(&self, input_len: usize) -> usize {
        self.initial_capacity
            .unwrap_or_else(|| input_len.saturating_mul(Self::CAPACITY_RATIO))
            .min(self.max_output_size)
    }
}

impl Default for InflateConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
