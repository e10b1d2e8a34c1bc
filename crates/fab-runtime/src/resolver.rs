//! The plugin resolver.
//!
//! Classifies configured plugin entries into build-capable and
//! runtime-capable plugins. Entries under `build` are loaded in insertion
//! order; an entry contributes a build plugin if its module exports a
//! build step, and a runtime plugin if its module exports a runtime setup
//! (one module may supply both). Entries under `runtime` that were not
//! already resolved via `build` are loaded afterwards and may only
//! contribute runtime plugins.
//!
//! A module exporting neither capability is skipped with a single
//! diagnostic. An identifier that cannot be resolved to a loadable module
//! aborts resolution.

use crate::error::{ResolveError, ResolveResult};
use crate::loader::{ModuleLoader, PluginModule};
use crate::locate::PluginLocator;
use fab_core::{BuildStep, FabConfig, PluginArgs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// A build-capable plugin, consumed once by the build orchestrator.
#[derive(Clone)]
pub struct ResolvedBuildPlugin {
    /// The configured plugin identifier.
    pub plugin_name: String,

    /// Arguments configured for this plugin.
    pub plugin_args: PluginArgs,

    /// The module's build-step export.
    pub build_step: Arc<dyn BuildStep>,
}

impl std::fmt::Debug for ResolvedBuildPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBuildPlugin")
            .field("plugin_name", &self.plugin_name)
            .field("plugin_args", &self.plugin_args)
            .finish()
    }
}

/// A runtime-capable plugin entry, persisted into the artifact's runtime
/// manifest and reloaded by the dispatcher at serve time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRuntimePlugin {
    /// The configured plugin identifier.
    pub plugin_name: String,

    /// Absolute path of the module's entry file.
    pub entry_path: PathBuf,

    /// Arguments handed to the module's runtime setup at serve time.
    pub plugin_args: PluginArgs,
}

/// A non-fatal resolution diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// A loaded module exports neither capability.
    NoCapability { identifier: String },
}

impl std::fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveWarning::NoCapability { identifier } => write!(
                f,
                "Plugin {identifier} exports neither a \"build\" or \"runtime\" export, ignoring it."
            ),
        }
    }
}

/// The resolver's output: both ordered plugin lists plus diagnostics.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Build-capable plugins, in build-config order.
    pub build_plugins: Vec<ResolvedBuildPlugin>,

    /// Runtime-capable plugins, in capability-discovery order:
    /// build-config entries first, then runtime-only entries.
    pub runtime_plugins: Vec<ResolvedRuntimePlugin>,

    /// Diagnostics for skipped entries.
    pub warnings: Vec<ResolveWarning>,
}

/// The classification engine.
pub struct PluginResolver {
    locator: PluginLocator,
    loader: Arc<dyn ModuleLoader>,
}

impl PluginResolver {
    /// Create a resolver over a module loader, with the default locator.
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self { locator: PluginLocator::new(), loader }
    }

    /// Create a resolver with a custom locator.
    pub fn with_locator(loader: Arc<dyn ModuleLoader>, locator: PluginLocator) -> Self {
        Self { locator, loader }
    }

    /// Resolve every configured plugin entry, rooted at the directory
    /// containing the configuration file.
    pub fn resolve(&self, base_dir: &Path, config: &FabConfig) -> ResolveResult<Resolution> {
        let mut resolution = Resolution::default();

        for (plugin_name, plugin_args) in &config.build {
            let module = self.load(base_dir, plugin_name)?;
            let mut capable = false;

            if let Some(build_step) = module.build_step() {
                resolution.build_plugins.push(ResolvedBuildPlugin {
                    plugin_name: plugin_name.clone(),
                    plugin_args: plugin_args.clone(),
                    build_step,
                });
                capable = true;
            }

            if module.has_runtime_setup() {
                resolution.runtime_plugins.push(ResolvedRuntimePlugin {
                    plugin_name: plugin_name.clone(),
                    entry_path: module.entry_path().to_path_buf(),
                    plugin_args: plugin_args.clone(),
                });
                capable = true;
            }

            if !capable {
                resolution.warn(plugin_name);
            }
        }

        for identifier in &config.runtime {
            // Already resolved via the build map; even a build-only module
            // is a silent no-op here.
            if config.build.contains_key(identifier) {
                continue;
            }

            let module = self.load(base_dir, identifier)?;
            if module.has_runtime_setup() {
                resolution.runtime_plugins.push(ResolvedRuntimePlugin {
                    plugin_name: identifier.clone(),
                    entry_path: module.entry_path().to_path_buf(),
                    plugin_args: PluginArgs::new(),
                });
            } else {
                resolution.warn(identifier);
            }
        }

        info!(
            build_plugins = resolution.build_plugins.len(),
            runtime_plugins = resolution.runtime_plugins.len(),
            "Resolved plugins"
        );
        Ok(resolution)
    }

    fn load(&self, base_dir: &Path, identifier: &str) -> ResolveResult<PluginModule> {
        let entry_path = self.locator.locate(base_dir, identifier)?;
        self.loader.load(&entry_path).map_err(|source| ResolveError::LoadFailed {
            identifier: identifier.to_string(),
            source: Box::new(source),
        })
    }
}

impl Resolution {
    fn warn(&mut self, identifier: &str) {
        let warning = ResolveWarning::NoCapability { identifier: identifier.to_string() };
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ModuleRegistry;
    use async_trait::async_trait;
    use fab_core::{
        BuildScope, FabPlugin, PluginError, PluginMetadata, RequestContext, Responder,
        ResponderOutcome, RuntimeSetup,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct NoopStep;

    #[async_trait]
    impl BuildStep for NoopStep {
        async fn build(&self, _args: &PluginArgs, _fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
            Ok(())
        }
    }

    struct NoopResponder;

    #[async_trait]
    impl Responder for NoopResponder {
        async fn respond(&self, _ctx: &RequestContext) -> Result<ResponderOutcome, PluginError> {
            Ok(ResponderOutcome::Decline)
        }
    }

    struct NoopSetup;

    impl RuntimeSetup for NoopSetup {
        fn setup(
            &self,
            _args: &PluginArgs,
            _metadata: &PluginMetadata,
        ) -> Result<Arc<dyn Responder>, PluginError> {
            Ok(Arc::new(NoopResponder))
        }
    }

    struct TestPlugin {
        build: bool,
        runtime: bool,
    }

    impl FabPlugin for TestPlugin {
        fn build_step(&self) -> Option<Arc<dyn BuildStep>> {
            self.build.then(|| Arc::new(NoopStep) as Arc<dyn BuildStep>)
        }

        fn runtime_setup(&self) -> Option<Arc<dyn RuntimeSetup>> {
            self.runtime.then(|| Arc::new(NoopSetup) as Arc<dyn RuntimeSetup>)
        }
    }

    fn test_registry() -> Arc<ModuleRegistry> {
        let mut registry = ModuleRegistry::new();
        registry.register("both", Arc::new(TestPlugin { build: true, runtime: true }));
        registry.register("build-only", Arc::new(TestPlugin { build: true, runtime: false }));
        registry.register("runtime-only", Arc::new(TestPlugin { build: false, runtime: true }));
        registry.register("inert", Arc::new(TestPlugin { build: false, runtime: false }));
        Arc::new(registry)
    }

    fn write_plugin(base_dir: &Path, name: &str, implementation: &str) -> PathBuf {
        let dir = base_dir.join("plugins").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("plugin.toml");
        std::fs::write(&path, format!("[plugin]\nimplementation = \"{implementation}\"\n")).unwrap();
        path
    }

    #[test]
    fn test_build_only_listed_in_runtime_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        write_plugin(temp_dir.path(), "build-only", "build-only");

        let mut config = FabConfig::default();
        config.build.insert("./plugins/build-only".to_string(), PluginArgs::new());
        config.runtime.push("./plugins/build-only".to_string());

        let resolution = PluginResolver::new(test_registry())
            .resolve(temp_dir.path(), &config)
            .unwrap();

        assert_eq!(resolution.build_plugins.len(), 1);
        assert!(resolution.runtime_plugins.is_empty());
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_runtime_only_entries_never_contribute_build_plugins() {
        let temp_dir = TempDir::new().unwrap();
        write_plugin(temp_dir.path(), "sneaky", "both");

        let mut config = FabConfig::default();
        config.runtime.push("./plugins/sneaky".to_string());

        let resolution = PluginResolver::new(test_registry())
            .resolve(temp_dir.path(), &config)
            .unwrap();

        assert!(resolution.build_plugins.is_empty());
        assert_eq!(resolution.runtime_plugins.len(), 1);
        assert!(resolution.runtime_plugins[0].plugin_args.is_empty());
    }

    #[test]
    fn test_duplicate_identifiers_not_deduplicated() {
        let temp_dir = TempDir::new().unwrap();
        let entry = write_plugin(temp_dir.path(), "runtime-only", "runtime-only");

        let mut config = FabConfig::default();
        config.runtime.push("./plugins/runtime-only".to_string());
        config.runtime.push("./plugins/runtime-only/plugin.toml".to_string());

        let resolution = PluginResolver::new(test_registry())
            .resolve(temp_dir.path(), &config)
            .unwrap();

        let expected = std::fs::canonicalize(entry).unwrap();
        assert_eq!(resolution.runtime_plugins.len(), 2);
        assert!(resolution.runtime_plugins.iter().all(|p| p.entry_path == expected));
    }

    #[test]
    fn test_unresolvable_identifier_aborts() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = FabConfig::default();
        config.build.insert("./plugins/missing".to_string(), PluginArgs::new());

        let result = PluginResolver::new(test_registry()).resolve(temp_dir.path(), &config);
        assert!(matches!(
            result,
            Err(ResolveError::UnresolvablePlugin { identifier }) if identifier == "./plugins/missing"
        ));
    }

    #[test]
    fn test_unknown_implementation_carries_identifier() {
        let temp_dir = TempDir::new().unwrap();
        write_plugin(temp_dir.path(), "ghost", "never-registered");

        let mut config = FabConfig::default();
        config.build.insert("./plugins/ghost".to_string(), PluginArgs::new());

        let result = PluginResolver::new(test_registry()).resolve(temp_dir.path(), &config);
        match result {
            Err(ResolveError::LoadFailed { identifier, source }) => {
                assert_eq!(identifier, "./plugins/ghost");
                assert!(matches!(*source, ResolveError::UnknownImplementation { .. }));
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_warning_text_matches_contract() {
        let warning = ResolveWarning::NoCapability { identifier: "./plugins/empty".to_string() };
        assert_eq!(
            warning.to_string(),
            "Plugin ./plugins/empty exports neither a \"build\" or \"runtime\" export, ignoring it."
        );
    }
}
