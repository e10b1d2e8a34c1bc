//! # fab-runtime
//!
//! Plugin location, loading, and resolution for the Fab bundle compiler.
//!
//! This crate provides:
//! - Plugin descriptor parsing (`plugin.toml`)
//! - Identifier-to-entry-path resolution (local paths and installed
//!   packages)
//! - The `ModuleLoader` trait and its registry-backed implementation
//! - The plugin resolver, which classifies configured entries into
//!   build-capable and runtime-capable plugins
//!
//! ## Plugin Structure
//!
//! A plugin's entry module is a `plugin.toml` descriptor naming a
//! registered implementation. Local identifiers (`./` or `../`) resolve
//! relative to the directory containing the configuration file; all other
//! identifiers resolve as installed packages searched in the package
//! directories.

pub mod descriptor;
pub mod error;
pub mod loader;
pub mod locate;
pub mod resolver;

pub use descriptor::{DescriptorMeta, PluginDescriptor};
pub use error::{ResolveError, ResolveResult};
pub use loader::{ModuleLoader, ModuleRegistry, PluginModule};
pub use locate::{user_packages_dir, PluginLocator, DESCRIPTOR_FILE};
pub use resolver::{
    PluginResolver, ResolvedBuildPlugin, ResolvedRuntimePlugin, Resolution, ResolveWarning,
};
