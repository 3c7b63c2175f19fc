//! # image-presets
//!
//! Resized image variants on demand. An original is stored once; asking for it
//! at a named size preset (`icon`, `big`, …) produces the variant the first
//! time, caches it in storage next to the original, and returns a public URL.
//! Deleting the original removes its variants too.
//!
//! ```no_run
//! use image_presets::imaging::RustBackend;
//! use image_presets::storage::LocalStorage;
//! use image_presets::store::{Image, VariantConfig};
//!
//! let storage = LocalStorage::new("storage/app", "https://example.com/storage");
//! let url = Image::new("photo.png")
//!     .get(&storage, &RustBackend::new(), &VariantConfig::default(), "icon")
//!     .unwrap();
//! assert_eq!(url, "https://example.com/storage/images/photo-48x48.png");
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | The [`Image`](store::Image) handle: get (lazy variants), create, save, delete |
//! | [`presets`] | Immutable table of named sizes; the reserved `original` size |
//! | [`naming`] | Variant and upload filename conventions |
//! | [`storage`] | [`Storage`](storage::Storage) trait and the local filesystem backend |
//! | [`imaging`] | [`ImageBackend`](imaging::ImageBackend) trait, fit math, `image`-crate backend |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Filename Is the Cache Key
//!
//! A variant's name embeds its dimensions (`photo-48x48.png`), so "is it
//! cached?" is a single existence check in storage. There is no manifest and
//! no content hashing: a variant, once written, is never regenerated.
//! Replacing an original under the same name means deleting it first.
//!
//! ## Explicit Handles, No Globals
//!
//! Every operation receives its storage, image backend and preset table as
//! arguments. Tests swap in an in-memory storage and a recording backend
//! without any global setup.
//!
//! ## Fit, Not Resize
//!
//! Variants always have exactly the preset's dimensions: the original is
//! scaled to cover the target and center-cropped. Callers can lay out
//! thumbnails without knowing the source aspect ratio.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod presets;
pub mod storage;
pub mod store;
