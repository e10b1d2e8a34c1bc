//! The build orchestrator.
//!
//! Build steps run strictly sequentially: plugin N's step completes,
//! including all its suspensions, before plugin N+1 starts, because later
//! plugins may depend on metadata written by earlier ones. The
//! bundle-in-progress is owned here and handed to exactly one step at a
//! time.
//!
//! The first failing step aborts the build; no partial bundle is
//! published.

use crate::content_type::content_type_for;
use fab_core::{Fab, PluginError, ProtoFab};
use fab_runtime::ResolvedBuildPlugin;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// Errors terminating a build.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A build step raised during execution.
    #[error("build step for plugin {plugin_name} failed: {source}")]
    Step {
        plugin_name: String,
        #[source]
        source: PluginError,
    },
}

/// Run every build-capable plugin against a fresh bundle and finalize it.
///
/// `base_dir` is the directory containing the configuration file; build
/// steps resolve relative input paths against it.
pub async fn run_build(
    build_plugins: &[ResolvedBuildPlugin],
    base_dir: &Path,
) -> Result<Fab, BuildError> {
    let mut proto_fab = ProtoFab::new();

    for plugin in build_plugins {
        info!(plugin = %plugin.plugin_name, "Running build step");

        let mut scope = proto_fab.scope(&plugin.plugin_name, base_dir);
        plugin
            .build_step
            .build(&plugin.plugin_args, &mut scope)
            .await
            .map_err(|source| {
                error!(plugin = %plugin.plugin_name, error = %source, "Build step failed");
                BuildError::Step { plugin_name: plugin.plugin_name.clone(), source }
            })?;
    }

    let fab = proto_fab.finalize(content_type_for);
    info!(files = fab.files.len(), "Build complete");
    Ok(fab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fab_core::{BuildScope, BuildStep, PluginArgs};
    use fab_runtime::ResolvedBuildPlugin;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn plugin(name: &str, step: impl BuildStep + 'static) -> ResolvedBuildPlugin {
        ResolvedBuildPlugin {
            plugin_name: name.to_string(),
            plugin_args: PluginArgs::new(),
            build_step: Arc::new(step),
        }
    }

    struct WriteMarker;

    #[async_trait]
    impl BuildStep for WriteMarker {
        async fn build(&self, _args: &PluginArgs, fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
            fab.set_metadata("marker", json!("set"));
            fab.write_file("marker.txt", "marker");
            Ok(())
        }
    }

    struct ReadMarker;

    #[async_trait]
    impl BuildStep for ReadMarker {
        async fn build(&self, _args: &PluginArgs, fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
            let seen = fab.metadata("first", "marker").cloned();
            fab.set_metadata("saw_marker", json!(seen.is_some()));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl BuildStep for Failing {
        async fn build(&self, _args: &PluginArgs, _fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
            Err(PluginError::msg("boom"))
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl BuildStep for Counting {
        async fn build(&self, _args: &PluginArgs, _fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_earlier_metadata_visible_to_later_steps() {
        let plugins = vec![plugin("first", WriteMarker), plugin("second", ReadMarker)];

        let fab = run_build(&plugins, Path::new(".")).await.unwrap();
        assert_eq!(
            fab.metadata.plugin_metadata.get("second", "saw_marker"),
            Some(&json!(true))
        );
    }

    #[tokio::test]
    async fn test_failure_aborts_before_later_steps() {
        let ran = Arc::new(AtomicUsize::new(0));
        let plugins = vec![
            plugin("first", Failing),
            plugin("second", Counting(Arc::clone(&ran))),
        ];

        let result = run_build(&plugins, Path::new(".")).await;
        match result {
            Err(BuildError::Step { plugin_name, source }) => {
                assert_eq!(plugin_name, "first");
                assert_eq!(source.to_string(), "boom");
            }
            Ok(_) => panic!("build should have failed"),
        }
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_finalized_metadata_covers_files() {
        let plugins = vec![plugin("first", WriteMarker)];

        let fab = run_build(&plugins, Path::new(".")).await.unwrap();
        assert!(fab.files.contains("marker.txt"));
        let meta = &fab.metadata.file_metadata["marker.txt"];
        assert_eq!(meta.content_length, 6);
        assert_eq!(meta.content_type, "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_empty_build_yields_empty_fab() {
        let fab = run_build(&[], Path::new(".")).await.unwrap();
        assert!(fab.files.is_empty());
        assert!(fab.metadata.plugin_metadata.is_empty());
        assert!(fab.metadata.file_metadata.is_empty());
    }
}
