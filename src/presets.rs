//! Named size presets.
//!
//! A preset maps a name (`icon`, `big`, …) to the exact dimensions a variant
//! is fitted to. The table is immutable once built: it comes from
//! [`PresetTable::default`] or from the `[presets]` section of the config,
//! which layers extra entries over the built-in ones.
//!
//! The name [`ORIGINAL`] is reserved. It is not a table entry; resolving it
//! yields [`SizeRequest::Original`], meaning "the stored file as-is".

use crate::imaging::Dimensions;
use std::collections::BTreeMap;
use thiserror::Error;

/// Size name that selects the unresized original.
pub const ORIGINAL: &str = "original";

/// Built-in presets.
const BUILTIN: &[(&str, u32, u32)] = &[
    ("big", 800, 600),
    ("icon", 48, 48),
    ("small", 96, 96),
    ("medium", 400, 400),
];

/// A size name that is neither a preset nor [`ORIGINAL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown size '{name}' (expected one of: {})", .known.join(", "))]
pub struct UnknownPreset {
    pub name: String,
    pub known: Vec<String>,
}

/// What a size name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRequest<'a> {
    Original,
    Preset { name: &'a str, dims: Dimensions },
}

/// Immutable mapping from preset name to target dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetTable {
    presets: BTreeMap<String, Dimensions>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|&(name, w, h)| (name.to_string(), Dimensions::new(w, h))),
        )
    }
}

impl PresetTable {
    /// Build a table from `(name, dimensions)` pairs. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Dimensions)>) -> Self {
        Self {
            presets: entries.into_iter().collect(),
        }
    }

    /// Resolve a size name to a preset or to the original.
    pub fn resolve<'a>(&'a self, size: &str) -> Result<SizeRequest<'a>, UnknownPreset> {
        if size == ORIGINAL {
            return Ok(SizeRequest::Original);
        }
        self.presets
            .get_key_value(size)
            .map(|(name, dims)| SizeRequest::Preset {
                name: name.as_str(),
                dims: *dims,
            })
            .ok_or_else(|| UnknownPreset {
                name: size.to_string(),
                known: self.names_with_original(),
            })
    }

    pub fn get(&self, name: &str) -> Option<Dimensions> {
        self.presets.get(name).copied()
    }

    /// Presets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Dimensions)> {
        self.presets.iter().map(|(name, dims)| (name.as_str(), *dims))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    fn names_with_original(&self) -> Vec<String> {
        std::iter::once(ORIGINAL.to_string())
            .chain(self.presets.keys().cloned())
            .collect()
    }
}
