//! Module loading.
//!
//! The loader turns a located entry file into a [`PluginModule`]: the
//! module's typed export surface. The default implementation,
//! [`ModuleRegistry`], parses the entry descriptor and binds it to an
//! implementation registered by the host; embedding tools register their
//! built-in plugins at startup.

use crate::descriptor::PluginDescriptor;
use crate::error::{ResolveError, ResolveResult};
use fab_core::{BuildStep, FabPlugin, RuntimeSetup};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A loaded plugin module: its entry path and exported capabilities.
#[derive(Clone)]
pub struct PluginModule {
    entry_path: PathBuf,
    build: Option<Arc<dyn BuildStep>>,
    runtime: Option<Arc<dyn RuntimeSetup>>,
}

impl PluginModule {
    /// Construct a module from explicit capability exports.
    pub fn new(
        entry_path: PathBuf,
        build: Option<Arc<dyn BuildStep>>,
        runtime: Option<Arc<dyn RuntimeSetup>>,
    ) -> Self {
        Self { entry_path, build, runtime }
    }

    /// Construct a module from a plugin implementation's exports.
    pub fn from_plugin(entry_path: PathBuf, plugin: &dyn FabPlugin) -> Self {
        Self::new(entry_path, plugin.build_step(), plugin.runtime_setup())
    }

    /// Absolute path of the entry file this module was loaded from.
    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    /// Whether the module exports a build step.
    pub fn has_build_step(&self) -> bool {
        self.build.is_some()
    }

    /// Whether the module exports a runtime setup.
    pub fn has_runtime_setup(&self) -> bool {
        self.runtime.is_some()
    }

    /// The build-step export, if present.
    pub fn build_step(&self) -> Option<Arc<dyn BuildStep>> {
        self.build.clone()
    }

    /// The runtime-setup export, if present.
    pub fn runtime_setup(&self) -> Option<Arc<dyn RuntimeSetup>> {
        self.runtime.clone()
    }
}

impl std::fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginModule")
            .field("entry_path", &self.entry_path)
            .field("has_build_step", &self.has_build_step())
            .field("has_runtime_setup", &self.has_runtime_setup())
            .finish()
    }
}

/// Loads a plugin's entry module from its resolved path.
///
/// The seam for the host module system: resolution validates capabilities
/// through this trait at build time, and the dispatcher reloads runtime
/// modules through it at serve time.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, entry_path: &Path) -> ResolveResult<PluginModule>;
}

/// Registry-backed module loader.
///
/// Maps implementation ids to plugin implementations. Loading parses the
/// entry descriptor and looks up the implementation it names.
#[derive(Default)]
pub struct ModuleRegistry {
    implementations: HashMap<String, Arc<dyn FabPlugin>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin implementation under an id.
    ///
    /// An existing implementation with the same id is replaced.
    pub fn register(&mut self, id: impl Into<String>, plugin: Arc<dyn FabPlugin>) {
        self.implementations.insert(id.into(), plugin);
    }

    /// Whether an implementation id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.implementations.contains_key(id)
    }

    /// Number of registered implementations.
    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }
}

impl ModuleLoader for ModuleRegistry {
    fn load(&self, entry_path: &Path) -> ResolveResult<PluginModule> {
        let descriptor = PluginDescriptor::from_file(entry_path)?;
        let implementation = &descriptor.plugin.implementation;

        let plugin = self.implementations.get(implementation).ok_or_else(|| {
            ResolveError::UnknownImplementation { implementation: implementation.clone() }
        })?;

        debug!(implementation, entry = %entry_path.display(), "Loaded plugin module");
        Ok(PluginModule::from_plugin(entry_path.to_path_buf(), plugin.as_ref()))
    }
}
