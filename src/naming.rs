//! Filename conventions for stored images.
//!
//! Two names are derived from others:
//!
//! - **Variant names** embed the preset's dimensions between the stem and the
//!   extension: `photo.png` at 48x48 → `photo-48x48.png`. The name alone
//!   identifies the variant, so a presence check in storage is the whole cache
//!   lookup.
//! - **Upload names** stamp the caller's chosen name with the upload time:
//!   `avatar` + `1700000000` + `jpg` → `avatar-1700000000.jpg`.
//!
//! Directory components are kept: `2024/photo.png` → `2024/photo-48x48.png`.

use crate::imaging::Dimensions;

/// A filename split into directory, stem, and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename<'a> {
    /// Everything before the last `/`, if any.
    pub dir: Option<&'a str>,
    /// Final path segment without its extension.
    pub stem: &'a str,
    /// Text after the last `.` of the final segment. A leading dot counts
    /// too: `.png` has an empty stem and extension `png`.
    pub extension: Option<&'a str>,
}

/// Split a filename following the rules above.
///
/// - `"photo.png"` → stem `"photo"`, extension `"png"`
/// - `"archive.tar.gz"` → stem `"archive.tar"`, extension `"gz"`
/// - `"README"` → stem `"README"`, no extension
/// - `".png"` → stem `""`, extension `"png"`
/// - `"2024/photo.png"` → dir `"2024"`, stem `"photo"`, extension `"png"`
pub fn split_filename(filename: &str) -> ParsedFilename<'_> {
    let (dir, base) = match filename.rsplit_once('/') {
        Some((dir, base)) => (Some(dir), base),
        None => (None, filename),
    };

    match base.rfind('.') {
        Some(dot) => ParsedFilename {
            dir,
            stem: &base[..dot],
            extension: Some(&base[dot + 1..]),
        },
        _ => ParsedFilename {
            dir,
            stem: base,
            extension: None,
        },
    }
}

/// Name of the variant of `filename` fitted to `dims`.
pub fn variant_filename(filename: &str, dims: Dimensions) -> String {
    let parsed = split_filename(filename);
    let mut name = String::with_capacity(filename.len() + 12);
    if let Some(dir) = parsed.dir {
        name.push_str(dir);
        name.push('/');
    }
    name.push_str(parsed.stem);
    name.push_str(&format!("-{}x{}", dims.width, dims.height));
    if let Some(ext) = parsed.extension {
        name.push('.');
        name.push_str(ext);
    }
    name
}

/// Name for a freshly uploaded original: `{name}-{timestamp}.{extension}`.
///
/// An empty extension leaves the name without a trailing dot.
pub fn upload_filename(name: &str, timestamp: i64, extension: &str) -> String {
    if extension.is_empty() {
        format!("{name}-{timestamp}")
    } else {
        format!("{name}-{timestamp}.{extension}")
    }
}
