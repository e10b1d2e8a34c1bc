//! # plugin-assets
//!
//! Build-only plugin that ingests a directory tree of static assets into
//! the bundle.
//!
//! Arguments:
//! - `dir` (required): source directory, relative to the config directory
//! - `prefix` (optional, default `_assets`): bundle path prefix
//!
//! Metadata written: `prefix` and `file_count`, for later plugins that
//! want to reference the ingested assets.

use async_trait::async_trait;
use fab_core::{BuildScope, BuildStep, FabPlugin, PluginArgs, PluginError};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// Static-asset ingestion plugin.
pub struct AssetsPlugin;

impl AssetsPlugin {
    /// Create a new assets plugin instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssetsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FabPlugin for AssetsPlugin {
    fn build_step(&self) -> Option<Arc<dyn BuildStep>> {
        Some(Arc::new(AssetsStep))
    }
}

struct AssetsStep;

#[async_trait]
impl BuildStep for AssetsStep {
    async fn build(&self, args: &PluginArgs, fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
        let dir = args
            .str_arg("dir")
            .ok_or_else(|| PluginError::msg("plugin-assets requires a 'dir' argument"))?;
        let prefix = args.str_arg("prefix").unwrap_or("_assets").trim_matches('/').to_string();
        let root = fab.base_dir().join(dir);

        let mut count = 0usize;
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|e| PluginError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(|e| PluginError::msg(e.to_string()))?;
            let name: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();

            let content = std::fs::read(entry.path())?;
            fab.write_file(format!("{prefix}/{}", name.join("/")), content);
            count += 1;
        }

        debug!(count, prefix = %prefix, "Ingested asset files");
        fab.set_metadata("prefix", json!(prefix));
        fab.set_metadata("file_count", json!(count));
        Ok(())
    }
}
