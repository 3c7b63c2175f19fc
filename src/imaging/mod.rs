//! Image processing in pure Rust, on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Fit** | Center crop to target aspect + Lanczos3 resize |
//! | **Encode** | JPEG at quality; PNG / TIFF / WebP lossless |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CropBox, calculate_crop_box};
pub use params::{EncodeParams, FitParams, OutputFormat, Quality};
pub use rust_backend::RustBackend;
