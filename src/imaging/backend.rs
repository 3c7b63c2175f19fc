//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the variant logic
//! needs: fit and reencode. Both take encoded bytes and return encoded bytes,
//! so the backend never touches storage.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{EncodeParams, FitParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image or a size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Everything above this trait is backend-agnostic; tests substitute a
/// recording mock.
pub trait ImageBackend {
    /// Center-crop `source` to the requested aspect, then resize it to exactly
    /// the requested size.
    fn fit(&self, source: &[u8], params: &FitParams) -> Result<Vec<u8>, BackendError>;

    /// Decode `source` and encode it again without resizing.
    fn reencode(&self, source: &[u8], params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
