//! Bundle artifact I/O.
//!
//! A built bundle is written to a directory:
//!
//! ```text
//! <bundle>/
//!   files/...        output files
//!   fab.json         published metadata (FabMetadata)
//!   runtime.json     runtime manifest (ordered plugin entries + timestamp)
//! ```
//!
//! The serve phase reads `fab.json` and `runtime.json` back; the file
//! contents are served by the embedding server from `files/`.

use chrono::{DateTime, Utc};
use fab_core::{Fab, FabMetadata, FabSettings};
use fab_runtime::ResolvedRuntimePlugin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Subdirectory holding the bundle's output files.
pub const FILES_DIR: &str = "files";

/// Published metadata file name.
pub const METADATA_FILE: &str = "fab.json";

/// Runtime manifest file name.
pub const RUNTIME_MANIFEST_FILE: &str = "runtime.json";

/// Errors reading or writing a bundle directory.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The serve-time manifest of runtime plugins, in chain order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeManifest {
    /// When the bundle was built.
    pub built_at: DateTime<Utc>,

    /// Runtime plugin entries, in dispatch order.
    pub plugins: Vec<ResolvedRuntimePlugin>,

    /// Per-environment settings carried over from the configuration.
    #[serde(default)]
    pub settings: BTreeMap<String, FabSettings>,
}

impl RuntimeManifest {
    /// Settings for one deployment environment (empty when unknown).
    pub fn settings_for(&self, env: &str) -> FabSettings {
        self.settings.get(env).cloned().unwrap_or_default()
    }
}

/// Write a built bundle and its runtime manifest to a directory.
pub fn write_bundle(
    dir: &Path,
    fab: &Fab,
    runtime_plugins: &[ResolvedRuntimePlugin],
    settings: &BTreeMap<String, FabSettings>,
) -> Result<(), ArtifactError> {
    let files_dir = dir.join(FILES_DIR);
    std::fs::create_dir_all(&files_dir)?;

    for (name, content) in fab.files.iter() {
        let path = files_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
    }

    let metadata = serde_json::to_vec_pretty(&fab.metadata)?;
    std::fs::write(dir.join(METADATA_FILE), metadata)?;

    let manifest = RuntimeManifest {
        built_at: Utc::now(),
        plugins: runtime_plugins.to_vec(),
        settings: settings.clone(),
    };
    let manifest_json = serde_json::to_vec_pretty(&manifest)?;
    std::fs::write(dir.join(RUNTIME_MANIFEST_FILE), manifest_json)?;

    info!(
        files = fab.files.len(),
        runtime_plugins = runtime_plugins.len(),
        bundle = %dir.display(),
        "Wrote bundle"
    );
    Ok(())
}

/// Read the published metadata back from a bundle directory.
pub fn read_metadata(dir: &Path) -> Result<FabMetadata, ArtifactError> {
    let content = std::fs::read(dir.join(METADATA_FILE))?;
    Ok(serde_json::from_slice(&content)?)
}

/// Read the runtime manifest back from a bundle directory.
pub fn read_runtime_manifest(dir: &Path) -> Result<RuntimeManifest, ArtifactError> {
    let content = std::fs::read(dir.join(RUNTIME_MANIFEST_FILE))?;
    Ok(serde_json::from_slice(&content)?)
}
