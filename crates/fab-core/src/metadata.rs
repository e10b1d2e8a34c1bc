//! Published bundle metadata.
//!
//! `FabMetadata` is the read-only artifact metadata consumed by runtime
//! plugin setup functions. It is serialized into the bundle at build end
//! and reconstructed, immutable, at serve time.

use crate::proto_fab::FabFiles;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata produced by build steps, one namespace per plugin.
///
/// Each plugin owns its own namespace; writes go through
/// [`BuildScope`](crate::proto_fab::BuildScope), which only exposes a
/// writer for the plugin it was scoped to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginMetadata(BTreeMap<String, serde_json::Map<String, serde_json::Value>>);

impl PluginMetadata {
    /// Create an empty metadata registry.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Read one value from a plugin's namespace.
    pub fn get(&self, plugin_name: &str, key: &str) -> Option<&serde_json::Value> {
        self.0.get(plugin_name).and_then(|ns| ns.get(key))
    }

    /// Read a plugin's whole namespace.
    pub fn namespace(&self, plugin_name: &str) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.0.get(plugin_name)
    }

    /// Names of plugins that have written metadata.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether no plugin has written metadata yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn set(&mut self, plugin_name: &str, key: String, value: serde_json::Value) {
        self.0.entry(plugin_name.to_string()).or_default().insert(key, value);
    }
}

/// Derived metadata for one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Media type derived from the file name and content.
    pub content_type: String,

    /// Content size in bytes.
    pub content_length: u64,
}

/// Derived metadata for every output file, keyed by filename.
///
/// Invariant: the key set is identical to the key set of the `FabFiles`
/// snapshot it was derived from.
pub type FabFileMetadata = BTreeMap<String, FileMeta>;

/// The published, read-only artifact metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FabMetadata {
    /// Per-file derived metadata.
    pub file_metadata: FabFileMetadata,

    /// Per-plugin build metadata.
    pub plugin_metadata: PluginMetadata,
}

/// Derive per-file metadata from a file snapshot.
///
/// Pure and idempotent: recomputing from an unchanged snapshot yields an
/// identical result.
pub fn derive_file_metadata(
    files: &FabFiles,
    content_type_for: impl Fn(&str, &[u8]) -> String,
) -> FabFileMetadata {
    files
        .iter()
        .map(|(name, content)| {
            let meta = FileMeta {
                content_type: content_type_for(name, content),
                content_length: content.len() as u64,
            };
            (name.clone(), meta)
        })
        .collect()
}
