//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered box inside `source` with the aspect ratio of `target`.
///
/// Fitting crops the source to this box and then resizes the box to exactly
/// `target`. The box never exceeds the source, so the only image larger than
/// the source is the final output.
///
/// ```
/// # use image_presets::imaging::{CropBox, calculate_crop_box};
/// // 1600x900 (16:9) into 800x600 (4:3) → keep full height, trim 200px per side
/// assert_eq!(
///     calculate_crop_box((1600, 900), (800, 600)),
///     CropBox { x: 200, y: 0, width: 1200, height: 900 }
/// );
/// ```
pub fn calculate_crop_box(source: (u32, u32), target: (u32, u32)) -> CropBox {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if src_w == 0 || src_h == 0 || tgt_w == 0 || tgt_h == 0 {
        return CropBox {
            x: 0,
            y: 0,
            width: src_w,
            height: src_h,
        };
    }

    // Compare aspect ratios without floats: src_w/src_h vs tgt_w/tgt_h
    let (width, height) = if src_w as u64 * tgt_h as u64 > src_h as u64 * tgt_w as u64 {
        // Source is wider: keep full height
        (scaled(src_h, tgt_w, tgt_h).clamp(1, src_w), src_h)
    } else {
        // Source is taller (or equal): keep full width
        (src_w, scaled(src_w, tgt_h, tgt_w).clamp(1, src_h))
    };

    CropBox {
        x: (src_w - width) / 2,
        y: (src_h - height) / 2,
        width,
        height,
    }
}

/// `value * num / den`, rounded to nearest.
fn scaled(value: u32, num: u32, den: u32) -> u32 {
    let den = den as u64;
    let rounded = (value as u64 * num as u64 + den / 2) / den;
    rounded.min(u32::MAX as u64) as u32
}
