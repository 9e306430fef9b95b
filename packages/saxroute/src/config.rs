//! Configuration constants and validation functions for the parser.

use crate::error::{Result, SaxrouteError};

/// Default number of bytes read from the input per chunk (10 KiB).
pub const READ_CHUNK_SIZE: usize = 10 * 1024;

/// Smallest accepted chunk size.
pub const MIN_CHUNK_SIZE: usize = 1;

/// Largest accepted chunk size (16 MiB).
///
/// The chunk buffer is allocated up front, so this bounds the memory a
/// single parse reserves for reading.
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Validate a read chunk size.
///
/// # Examples
/// ```
/// use saxroute::config::validate_chunk_size;
///
/// assert!(validate_chunk_size(4096).is_ok());
/// assert!(validate_chunk_size(0).is_err());
/// ```
pub fn validate_chunk_size(size: usize) -> Result<()> {
    if (MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(SaxrouteError::InvalidChunkSize {
            size,
            min: MIN_CHUNK_SIZE,
            max: MAX_CHUNK_SIZE,
        })
    }
}

/// Options for a single parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Number of bytes read from the input at a time.
    pub chunk_size: usize,
}

impl ParseOptions {
    /// Create options with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: READ_CHUNK_SIZE,
        }
    }

    /// Set the chunk size after validating it.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        validate_chunk_size(chunk_size)?;
        self.chunk_size = chunk_size;
        Ok(self)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
