//! Errors for the fallible parts of the API.
//!
//! Rendering itself never fails: malformed paints and degenerate matrices
//! fall back locally and are reported through [`crate::Diagnostics`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[cfg(feature = "png")]
    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),
}
