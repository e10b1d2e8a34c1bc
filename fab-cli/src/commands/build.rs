//! The `fab build` subcommand.
//!
//! Reads the configuration file, resolves every configured plugin, runs
//! the build-capable plugins in order, and writes the finished bundle to
//! the output directory.

use crate::registry::builtin_registry;
use anyhow::{Context, Result};
use fab_build::run_build;
use fab_core::FabConfig;
use fab_runtime::PluginResolver;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(config_path: &Path, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: FabConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    let base_dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let base_dir = std::fs::canonicalize(base_dir)
        .with_context(|| format!("Failed to resolve config directory: {}", base_dir.display()))?;

    let resolver = PluginResolver::new(Arc::new(builtin_registry()));
    let resolution = resolver
        .resolve(&base_dir, &config)
        .context("Plugin resolution failed")?;

    let fab = run_build(&resolution.build_plugins, &base_dir).await?;
    fab_serve::write_bundle(output, &fab, &resolution.runtime_plugins, &config.settings)
        .with_context(|| format!("Failed to write bundle: {}", output.display()))?;

    info!(bundle = %output.display(), "Build finished");
    println!(
        "Built {} file(s) with {} build plugin(s); {} runtime plugin(s) in the manifest.",
        fab.files.len(),
        resolution.build_plugins.len(),
        resolution.runtime_plugins.len()
    );
    Ok(())
}
