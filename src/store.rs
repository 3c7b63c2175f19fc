//! Stored images and their size variants.
//!
//! An [`Image`] is nothing more than a filename understood by the storage
//! backend. Every stored file lives under the `images/` prefix
//! ([`storage_key`]); variants sit next to their original under the name
//! produced by [`naming::variant_filename`](crate::naming::variant_filename).
//!
//! # Lazy variants
//!
//! [`Image::get`] makes the requested variant exist and returns its URL:
//!
//! ```text
//! get("icon")  →  images/photo-48x48.png present?  ── yes ──→ URL
//!                                 │ no
//!                                 ↓
//!                 read images/photo.png → fit 48x48 → write → URL
//! ```
//!
//! The presence check is by name only. A variant, once written, is never
//! regenerated, even if the original is replaced under the same name; use
//! [`delete`] to drop the original together with its variants.
//!
//! Nothing here holds state between calls: storage, backend and config are
//! passed in explicitly, so tests run against in-memory doubles.

use crate::imaging::{
    BackendError, EncodeParams, FitParams, ImageBackend, OutputFormat, Quality,
};
use crate::naming;
use crate::presets::{PresetTable, SizeRequest, UnknownPreset};
use crate::storage::{Storage, StorageError};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Storage prefix for all images, originals and variants alike.
pub const IMAGES_PREFIX: &str = "images";

#[derive(Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    UnknownPreset(#[from] UnknownPreset),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Image processing error: {0}")]
    Backend(#[from] BackendError),
    #[error("No output format for '{0}' (supported: jpg, jpeg, png, tif, tiff, webp)")]
    UnsupportedExtension(String),
    #[error("Original image does not exist: {0}")]
    MissingOriginal(String),
    #[error("Deleted original, but failed to delete variants: {}", .failed.join(", "))]
    IncompleteDelete { failed: Vec<String> },
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Settings every variant operation needs.
#[derive(Debug, Clone, Default)]
pub struct VariantConfig {
    pub presets: PresetTable,
    pub quality: Quality,
}

/// How a requested variant came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    /// The unresized original was requested.
    Original,
    /// The variant was already in storage.
    Cached,
    /// The variant was fitted and written by this call.
    Generated,
}

/// Result of [`Image::get_variant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub size: String,
    pub filename: String,
    pub url: String,
    pub status: VariantStatus,
}

/// Result of a successful [`delete`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub original: String,
    pub variants_removed: Vec<String>,
}

/// An uploaded file waiting to become a stored original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Filename as the client sent it; only its extension is used.
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(original_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes,
        }
    }

    /// Read a local file as an upload.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            original_name,
            bytes,
        })
    }

    /// Extension of the client's filename, as sent (case preserved).
    pub fn extension(&self) -> &str {
        naming::split_filename(&self.original_name)
            .extension
            .unwrap_or("")
    }
}

/// A stored original, identified by its filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    filename: String,
}

impl Image {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// The wrapped filename.
    pub fn name(&self) -> &str {
        &self.filename
    }

    /// Filename of this image at `size` (`"original"` or a preset name).
    ///
    /// An unknown size is an [`ImageError::UnknownPreset`], as in
    /// [`get`](Self::get), never the original filename.
    pub fn variant_name(&self, presets: &PresetTable, size: &str) -> Result<String> {
        Ok(match presets.resolve(size)? {
            SizeRequest::Original => self.filename.clone(),
            SizeRequest::Preset { dims, .. } => naming::variant_filename(&self.filename, dims),
        })
    }

    /// URL of this image at `size`, generating the variant first if needed.
    pub fn get(
        &self,
        storage: &impl Storage,
        backend: &impl ImageBackend,
        config: &VariantConfig,
        size: &str,
    ) -> Result<String> {
        self.get_variant(storage, backend, config, size)
            .map(|variant| variant.url)
    }

    /// Like [`get`](Self::get), but also reports the variant's filename and
    /// whether this call generated it.
    pub fn get_variant(
        &self,
        storage: &impl Storage,
        backend: &impl ImageBackend,
        config: &VariantConfig,
        size: &str,
    ) -> Result<Variant> {
        let (filename, status) = match config.presets.resolve(size)? {
            SizeRequest::Original => {
                if !exists(storage, &self.filename) {
                    return Err(ImageError::MissingOriginal(self.filename.clone()));
                }
                (self.filename.clone(), VariantStatus::Original)
            }
            SizeRequest::Preset { name, dims } => {
                let filename = naming::variant_filename(&self.filename, dims);
                if exists(storage, &filename) {
                    tracing::debug!(
                        original = %self.filename,
                        preset = name,
                        %filename,
                        "variant cached"
                    );
                    (filename, VariantStatus::Cached)
                } else {
                    let source = match storage.read(&storage_key(&self.filename)) {
                        Ok(bytes) => bytes,
                        Err(StorageError::NotFound(_)) => {
                            return Err(ImageError::MissingOriginal(self.filename.clone()));
                        }
                        Err(e) => return Err(e.into()),
                    };
                    let params = FitParams {
                        width: dims.width,
                        height: dims.height,
                        format: output_format(&filename)?,
                        quality: config.quality,
                    };
                    let bytes = backend.fit(&source, &params)?;
                    storage.write(&storage_key(&filename), &bytes)?;
                    tracing::info!(
                        original = %self.filename,
                        preset = name,
                        %filename,
                        size = %dims,
                        bytes = bytes.len(),
                        "generated variant"
                    );
                    (filename, VariantStatus::Generated)
                }
            }
        };

        Ok(Variant {
            size: size.to_string(),
            url: storage.url(&storage_key(&filename)),
            filename,
            status,
        })
    }
}

/// Storage key of `filename`: the images prefix joined with the filename.
pub fn storage_key(filename: &str) -> String {
    format!("{IMAGES_PREFIX}/{filename}")
}

/// Whether `filename` is stored.
pub fn exists(storage: &impl Storage, filename: &str) -> bool {
    storage.exists(&storage_key(filename))
}

fn output_format(filename: &str) -> Result<OutputFormat> {
    OutputFormat::from_filename(filename)
        .ok_or_else(|| ImageError::UnsupportedExtension(filename.to_string()))
}

/// Store an upload as a new original named `{name}-{unix time}.{extension}`.
///
/// The upload is decoded and re-encoded at the configured quality, not resized.
pub fn create(
    storage: &impl Storage,
    backend: &impl ImageBackend,
    config: &VariantConfig,
    upload: &Upload,
    name: &str,
) -> Result<Image> {
    create_at(
        storage,
        backend,
        config,
        upload,
        name,
        chrono::Utc::now().timestamp(),
    )
}

fn create_at(
    storage: &impl Storage,
    backend: &impl ImageBackend,
    config: &VariantConfig,
    upload: &Upload,
    name: &str,
    timestamp: i64,
) -> Result<Image> {
    let filename = naming::upload_filename(name, timestamp, upload.extension());
    save(storage, backend, &upload.bytes, &filename, config.quality)?;
    tracing::info!(%filename, upload = %upload.original_name, "stored upload");
    Ok(Image::new(filename))
}

/// Re-encode `source` at `quality` in the format implied by `filename` and
/// store it, overwriting any existing file.
pub fn save(
    storage: &impl Storage,
    backend: &impl ImageBackend,
    source: &[u8],
    filename: &str,
    quality: Quality,
) -> Result<()> {
    let params = EncodeParams {
        format: output_format(filename)?,
        quality,
    };
    let bytes = backend.reencode(source, &params)?;
    storage.write(&storage_key(filename), &bytes)?;
    Ok(())
}

/// Delete an original and every variant of it that exists.
///
/// Variants are removed first; a variant that fails to delete does not stop
/// the others or the original. The original's own failure is returned as-is.
/// If the original went but some variant did not, the result is
/// [`ImageError::IncompleteDelete`] naming the leftovers.
pub fn delete(
    storage: &impl Storage,
    presets: &PresetTable,
    filename: &str,
) -> Result<DeleteReport> {
    let mut report = DeleteReport {
        original: filename.to_string(),
        variants_removed: Vec::new(),
    };
    let mut failed = Vec::new();

    for (preset, dims) in presets.iter() {
        let variant = naming::variant_filename(filename, dims);
        if !exists(storage, &variant) {
            continue;
        }
        match storage.delete(&storage_key(&variant)) {
            Ok(()) => {
                tracing::debug!(%variant, preset, "deleted variant");
                report.variants_removed.push(variant);
            }
            Err(e) => {
                tracing::warn!(%variant, preset, error = %e, "failed to delete variant");
                failed.push(variant);
            }
        }
    }

    storage.delete(&storage_key(filename))?;
    tracing::info!(
        original = filename,
        variants = report.variants_removed.len(),
        "deleted image"
    );

    if failed.is_empty() {
        Ok(report)
    } else {
        Err(ImageError::IncompleteDelete { failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::storage::tests::{MEMORY_BASE_URL, MemoryStorage};

    fn config() -> VariantConfig {
        VariantConfig::default()
    }

    fn storage_with_photo() -> MemoryStorage {
        MemoryStorage::with_file("images/photo.png", b"original-bytes")
    }

    #[test]
    fn name_returns_wrapped_filename() {
        assert_eq!(Image::new("photo.png").name(), "photo.png");
    }

    #[test]
    fn storage_key_joins_prefix() {
        assert_eq!(storage_key("photo.png"), "images/photo.png");
        assert_eq!(storage_key("2024/photo.png"), "images/2024/photo.png");
    }

    #[test]
    fn variant_name_per_preset() {
        let image = Image::new("photo.png");
        let presets = PresetTable::default();
        assert_eq!(image.variant_name(&presets, "icon").unwrap(), "photo-48x48.png");
        assert_eq!(image.variant_name(&presets, "big").unwrap(), "photo-800x600.png");
        assert_eq!(image.variant_name(&presets, "original").unwrap(), "photo.png");
        assert!(matches!(
            image.variant_name(&presets, "huge"),
            Err(ImageError::UnknownPreset(_))
        ));
    }

    #[test]
    fn get_original_returns_literal_filename_url() {
        let storage = storage_with_photo();
        let backend = MockBackend::new();

        let url = Image::new("photo.png")
            .get(&storage, &backend, &config(), "original")
            .unwrap();

        assert_eq!(url, format!("{MEMORY_BASE_URL}/images/photo.png"));
        assert!(backend.get_operations().is_empty());
        assert!(storage.get_writes().is_empty());
    }

    #[test]
    fn get_original_missing_errors() {
        let storage = MemoryStorage::new();
        let backend = MockBackend::new();

        let result = Image::new("ghost.png").get(&storage, &backend, &config(), "original");
        assert!(matches!(result, Err(ImageError::MissingOriginal(f)) if f == "ghost.png"));
    }

    #[test]
    fn get_preset_generates_variant() {
        let storage = storage_with_photo();
        let backend = MockBackend::new();

        let variant = Image::new("photo.png")
            .get_variant(&storage, &backend, &config(), "icon")
            .unwrap();

        assert_eq!(variant.filename, "photo-48x48.png");
        assert_eq!(variant.status, VariantStatus::Generated);
        assert_eq!(variant.url, format!("{MEMORY_BASE_URL}/images/photo-48x48.png"));
        assert_eq!(
            storage.contents("images/photo-48x48.png").unwrap(),
            b"fit:48x48:png:q80"
        );
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Fit {
                source: b"original-bytes".to_vec(),
                width: 48,
                height: 48,
                format: OutputFormat::Png,
                quality: 80,
            }]
        );
    }

    #[test]
    fn get_twice_fits_once() {
        let storage = storage_with_photo();
        let backend = MockBackend::new();
        let image = Image::new("photo.png");

        let first = image.get_variant(&storage, &backend, &config(), "big").unwrap();
        let second = image.get_variant(&storage, &backend, &config(), "big").unwrap();

        assert_eq!(first.status, VariantStatus::Generated);
        assert_eq!(second.status, VariantStatus::Cached);
        assert_eq!(first.url, second.url);
        assert_eq!(backend.fit_count(), 1);
        assert_eq!(storage.get_writes(), vec!["images/photo-800x600.png"]);
    }

    #[test]
    fn get_existing_variant_never_regenerates() {
        let storage = storage_with_photo();
        storage.insert("images/photo-96x96.png", b"stale");
        let backend = MockBackend::new();

        let variant = Image::new("photo.png")
            .get_variant(&storage, &backend, &config(), "small")
            .unwrap();

        assert_eq!(variant.status, VariantStatus::Cached);
        assert_eq!(storage.contents("images/photo-96x96.png").unwrap(), b"stale");
        assert_eq!(backend.fit_count(), 0);
    }

    #[test]
    fn get_unknown_size_is_rejected_before_io() {
        let storage = storage_with_photo();
        let backend = MockBackend::new();

        let result = Image::new("photo.png").get(&storage, &backend, &config(), "huge");

        assert!(matches!(result, Err(ImageError::UnknownPreset(e)) if e.name == "huge"));
        assert!(backend.get_operations().is_empty());
        assert!(storage.get_writes().is_empty());
    }

    #[test]
    fn get_preset_of_missing_original_errors() {
        let storage = MemoryStorage::new();
        let backend = MockBackend::new();

        let result = Image::new("ghost.jpg").get(&storage, &backend, &config(), "icon");
        assert!(matches!(result, Err(ImageError::MissingOriginal(_))));
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn get_uses_configured_quality_and_presets() {
        let storage = MemoryStorage::with_file("images/photo.jpg", b"x");
        let backend = MockBackend::new();
        let config = VariantConfig {
            presets: PresetTable::from_entries([(
                "banner".to_string(),
                Dimensions::new(1200, 300),
            )]),
            quality: Quality::new(65),
        };

        let variant = Image::new("photo.jpg")
            .get_variant(&storage, &backend, &config, "banner")
            .unwrap();

        assert_eq!(variant.filename, "photo-1200x300.jpg");
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Fit {
                width: 1200,
                height: 300,
                format: OutputFormat::Jpeg,
                quality: 65,
                ..
            }
        ));
    }

    #[test]
    fn get_unsupported_extension_errors_without_writing() {
        let storage = MemoryStorage::with_file("images/anim.gif", b"gif");
        let backend = MockBackend::new();

        let result = Image::new("anim.gif").get(&storage, &backend, &config(), "icon");
        assert!(matches!(result, Err(ImageError::UnsupportedExtension(_))));
        assert!(storage.get_writes().is_empty());
    }

    #[test]
    fn get_decode_failure_writes_nothing() {
        let storage = storage_with_photo();
        let backend = MockBackend::failing();

        let result = Image::new("photo.png").get(&storage, &backend, &config(), "icon");
        assert!(matches!(result, Err(ImageError::Backend(BackendError::Decode(_)))));
        assert!(!storage.exists("images/photo-48x48.png"));
    }

    #[test]
    fn exists_checks_under_images_prefix() {
        let storage = MemoryStorage::with_file("images/a.png", b"");
        assert!(exists(&storage, "a.png"));
        assert!(!exists(&storage, "images/a.png"));
    }

    #[test]
    fn create_names_file_with_timestamp_and_extension() {
        let storage = MemoryStorage::new();
        let backend = MockBackend::new();
        let upload = Upload::new("IMG_0001.JPG", b"camera".to_vec());

        let image =
            create_at(&storage, &backend, &config(), &upload, "avatar", 1_700_000_000).unwrap();

        assert_eq!(image.name(), "avatar-1700000000.JPG");
        assert_eq!(
            storage.contents("images/avatar-1700000000.JPG").unwrap(),
            b"reencode:jpeg:q80"
        );
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Reencode {
                source: b"camera".to_vec(),
                format: OutputFormat::Jpeg,
                quality: 80,
            }]
        );
    }

    #[test]
    fn create_uses_current_unix_time() {
        let storage = MemoryStorage::new();
        let backend = MockBackend::new();
        let upload = Upload::new("me.png", b"p".to_vec());

        let before = chrono::Utc::now().timestamp();
        let image = create(&storage, &backend, &config(), &upload, "avatar").unwrap();
        let after = chrono::Utc::now().timestamp();

        let stamp = image
            .name()
            .strip_prefix("avatar-")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        assert!(!stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()));
        let stamp: i64 = stamp.parse().unwrap();
        assert!((before..=after).contains(&stamp));
        assert!(exists(&storage, image.name()));
    }

    #[test]
    fn create_without_extension_is_rejected() {
        let storage = MemoryStorage::new();
        let backend = MockBackend::new();
        let upload = Upload::new("blob", b"?".to_vec());

        let result = create_at(&storage, &backend, &config(), &upload, "avatar", 1);
        assert!(matches!(result, Err(ImageError::UnsupportedExtension(f)) if f == "avatar-1"));
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn upload_extension_from_client_name() {
        assert_eq!(Upload::new("a.b.webp", vec![]).extension(), "webp");
        assert_eq!(Upload::new("noext", vec![]).extension(), "");
    }

    #[test]
    fn save_overwrites_at_quality() {
        let storage = MemoryStorage::with_file("images/out.jpg", b"old");
        let backend = MockBackend::new();

        save(&storage, &backend, b"src", "out.jpg", Quality::new(80)).unwrap();
        assert_eq!(storage.contents("images/out.jpg").unwrap(), b"reencode:jpeg:q80");
    }

    #[test]
    fn delete_removes_original_and_existing_variants() {
        let storage = storage_with_photo();
        storage.insert("images/photo-48x48.png", b"icon");
        storage.insert("images/photo-800x600.png", b"big");
        storage.insert("images/other.png", b"keep");

        let report = delete(&storage, &PresetTable::default(), "photo.png").unwrap();

        assert_eq!(report.original, "photo.png");
        assert_eq!(
            report.variants_removed,
            vec!["photo-800x600.png", "photo-48x48.png"]
        );
        assert_eq!(storage.keys(), vec!["images/other.png"]);
    }

    #[test]
    fn delete_without_variants_is_fine() {
        let storage = storage_with_photo();

        let report = delete(&storage, &PresetTable::default(), "photo.png").unwrap();
        assert!(report.variants_removed.is_empty());
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn delete_missing_original_errors() {
        let storage = MemoryStorage::new();
        storage.insert("images/photo-48x48.png", b"orphan");

        let result = delete(&storage, &PresetTable::default(), "photo.png");
        assert!(matches!(
            result,
            Err(ImageError::Storage(StorageError::NotFound(k))) if k == "images/photo.png"
        ));
        // Orphaned variants are still cleaned up
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn delete_reports_variant_failure_after_removing_original() {
        let storage = storage_with_photo();
        storage.insert("images/photo-48x48.png", b"icon");
        storage.insert("images/photo-96x96.png", b"small");
        storage.make_undeletable("images/photo-48x48.png");

        let result = delete(&storage, &PresetTable::default(), "photo.png");

        assert!(matches!(
            result,
            Err(ImageError::IncompleteDelete { ref failed }) if failed == &["photo-48x48.png"]
        ));
        assert_eq!(storage.keys(), vec!["images/photo-48x48.png"]);
    }
}
