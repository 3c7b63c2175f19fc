//! CLI output formatting.
//!
//! Output leads with the thing the user asked about (a URL, a filename) and
//! puts storage detail on indented context lines:
//!
//! ```text
//! $ image-presets get photo.png --size icon
//! http://localhost/storage/app/images/photo-48x48.png
//!     icon → photo-48x48.png (generated)
//!
//! $ image-presets delete photo.png
//! Deleted photo.png
//!     photo-800x600.png
//!     photo-48x48.png
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. With `--json`
//! the `print_*` wrappers emit the serialized result instead.

use crate::presets::PresetTable;
use crate::store::{DeleteReport, Variant, VariantStatus};
use serde::Serialize;

fn status_label(status: VariantStatus) -> &'static str {
    match status {
        VariantStatus::Original => "original",
        VariantStatus::Cached => "cached",
        VariantStatus::Generated => "generated",
    }
}

/// Lines for a `get` result.
pub fn format_variant(variant: &Variant) -> Vec<String> {
    vec![
        variant.url.clone(),
        format!(
            "    {} → {} ({})",
            variant.size,
            variant.filename,
            status_label(variant.status)
        ),
    ]
}

/// Lines for a `create` result.
pub fn format_created(filename: &str, url: &str) -> Vec<String> {
    vec![format!("Created {filename}"), format!("    {url}")]
}

/// Lines for a `delete` result.
pub fn format_deleted(report: &DeleteReport) -> Vec<String> {
    let mut lines = vec![format!("Deleted {}", report.original)];
    lines.extend(
        report
            .variants_removed
            .iter()
            .map(|variant| format!("    {variant}")),
    );
    lines
}

/// Lines for the `presets` listing, names padded to a common width.
pub fn format_presets(presets: &PresetTable) -> Vec<String> {
    let width = presets.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    presets
        .iter()
        .map(|(name, dims)| format!("{name:<width$}  {dims}"))
        .collect()
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_variant(variant: &Variant, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(variant);
    }
    print_lines(format_variant(variant));
    Ok(())
}

pub fn print_created(filename: &str, url: &str, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(&serde_json::json!({ "filename": filename, "url": url }));
    }
    print_lines(format_created(filename, url));
    Ok(())
}

pub fn print_deleted(report: &DeleteReport, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(report);
    }
    print_lines(format_deleted(report));
    Ok(())
}

pub fn print_presets(presets: &PresetTable, json: bool) -> Result<(), serde_json::Error> {
    if json {
        let map: serde_json::Map<String, serde_json::Value> = presets
            .iter()
            .map(|(name, dims)| (name.to_string(), serde_json::json!([dims.width, dims.height])))
            .collect();
        return print_json(&map);
    }
    print_lines(format_presets(presets));
    Ok(())
}
