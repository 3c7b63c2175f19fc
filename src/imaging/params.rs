//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`store`](crate::store) module (which decides which
//! variant to produce and where it goes) and the [`backend`](super::backend)
//! (which does the actual pixel work). Swapping the backend for a mock in tests
//! does not change any of the variant logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 80). Clamped on construction.
//! - [`OutputFormat`]: Encoded format, picked from the target filename's extension.
//! - [`FitParams`]: Fit to exact dimensions: target width/height, format, quality.
//! - [`EncodeParams`]: Re-encode without resizing: format, quality.

use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Encoded output format of a stored file.
///
/// Only JPEG honors [`Quality`]; the `image` crate's PNG, TIFF and WebP
/// encoders are lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Tiff,
    WebP,
}

impl OutputFormat {
    /// Pick the format for a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Pick the format from the extension of a filename or storage key.
    pub fn from_filename(filename: &str) -> Option<Self> {
        crate::naming::split_filename(filename)
            .extension
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
        };
        f.write_str(name)
    }
}

/// Parameters for a fit operation (center crop + resize to exact size).
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parameters for re-encoding an image without changing its dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    pub quality: Quality,
}
