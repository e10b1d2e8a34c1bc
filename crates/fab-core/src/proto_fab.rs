//! The in-progress bundle.
//!
//! A `ProtoFab` is created empty at build start, exclusively owned by the
//! build orchestrator, mutated by one build step at a time, and consumed
//! at build end into an immutable [`Fab`]. It never survives into the
//! serve phase.
//!
//! Build steps never see the `ProtoFab` directly: each step receives a
//! [`BuildScope`], which grants file access plus metadata writes into
//! that plugin's own namespace only. Prior plugins' metadata is readable,
//! never writable.

use crate::metadata::{derive_file_metadata, FabMetadata, PluginMetadata};
use std::collections::BTreeMap;
use std::path::Path;

/// Immutable snapshot of the bundle's output files, finalized at build end.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FabFiles(BTreeMap<String, Vec<u8>>);

impl FabFiles {
    /// Content of one file.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Whether a file exists in the snapshot.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bundle has no files.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over files in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.0.iter()
    }
}

/// The finalized bundle: file snapshot plus published metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fab {
    /// Output files.
    pub files: FabFiles,

    /// Published metadata, consumed by runtime plugin setup functions.
    pub metadata: FabMetadata,
}

/// The mutable bundle-in-progress.
#[derive(Debug, Default)]
pub struct ProtoFab {
    files: BTreeMap<String, Vec<u8>>,
    metadata: PluginMetadata,
}

impl ProtoFab {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// A build step's view of the bundle, scoped to one plugin's metadata
    /// namespace and rooted at the config directory.
    pub fn scope<'a>(&'a mut self, plugin_name: &'a str, base_dir: &'a Path) -> BuildScope<'a> {
        BuildScope { fab: self, plugin_name, base_dir }
    }

    /// Accumulated plugin metadata.
    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    /// Number of files written so far.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Snapshot the file collection, discarding metadata.
    pub fn into_files(self) -> FabFiles {
        FabFiles(self.files)
    }

    /// Finalize into an immutable [`Fab`].
    ///
    /// Per-file metadata is derived with the supplied content-type
    /// function; content lengths are byte lengths.
    pub fn finalize(self, content_type_for: impl Fn(&str, &[u8]) -> String) -> Fab {
        let files = FabFiles(self.files);
        let file_metadata = derive_file_metadata(&files, content_type_for);
        Fab {
            files,
            metadata: FabMetadata { file_metadata, plugin_metadata: self.metadata },
        }
    }
}

/// One build step's access to the shared bundle.
///
/// Files are shared between plugins; metadata writes land in the scoped
/// plugin's namespace only.
pub struct BuildScope<'a> {
    fab: &'a mut ProtoFab,
    plugin_name: &'a str,
    base_dir: &'a Path,
}

impl BuildScope<'_> {
    /// The plugin this scope belongs to.
    pub fn plugin_name(&self) -> &str {
        self.plugin_name
    }

    /// The directory containing the configuration file; build steps
    /// resolve relative input paths against it.
    pub fn base_dir(&self) -> &Path {
        self.base_dir
    }

    /// Add or replace an output file.
    pub fn write_file(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.fab.files.insert(name.into(), content.into());
    }

    /// Remove an output file. Returns whether it existed.
    pub fn remove_file(&mut self, name: &str) -> bool {
        self.fab.files.remove(name).is_some()
    }

    /// Content of one file, written by this or any earlier plugin.
    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.fab.files.get(name).map(Vec::as_slice)
    }

    /// Names of all files written so far, in name order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.fab.files.keys().map(String::as_str)
    }

    /// Write one value into this plugin's metadata namespace.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.fab.metadata.set(self.plugin_name, key.into(), value);
    }

    /// Read metadata written by any plugin so far.
    pub fn metadata(&self, plugin_name: &str, key: &str) -> Option<&serde_json::Value> {
        self.fab.metadata.get(plugin_name, key)
    }
}
