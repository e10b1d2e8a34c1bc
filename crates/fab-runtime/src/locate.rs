//! Plugin identifier resolution.
//!
//! Identifiers beginning with `./` or `../` are local: they resolve
//! relative to the directory containing the configuration file. Every
//! other identifier is an installed package, searched in the package
//! directories (in order):
//!
//! 1. `<config dir>/fab_plugins/` (project packages)
//! 2. Any directories added with [`PluginLocator::with_package_dir`]
//! 3. The per-user data directory (user packages)
//!
//! A resolved identifier always points at a descriptor file, which is
//! canonicalized to an absolute path.

use crate::error::{ResolveError, ResolveResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of a plugin's entry descriptor inside its directory.
pub const DESCRIPTOR_FILE: &str = "plugin.toml";

/// Directory of project-local installed packages, under the config dir.
const PROJECT_PACKAGES_DIR: &str = "fab_plugins";

/// Get the per-user packages directory.
pub fn user_packages_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "fabworks", "fab")
        .map(|dirs| dirs.data_dir().join("plugins"))
}

/// Resolves plugin identifiers to absolute entry-file paths.
#[derive(Debug, Clone, Default)]
pub struct PluginLocator {
    extra_package_dirs: Vec<PathBuf>,
}

impl PluginLocator {
    /// Create a locator with the default package search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package directory searched after the project packages.
    pub fn with_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_package_dirs.push(dir.into());
        self
    }

    /// Resolve an identifier rooted at the config directory.
    pub fn locate(&self, base_dir: &Path, identifier: &str) -> ResolveResult<PathBuf> {
        let entry = if is_local(identifier) {
            self.locate_local(base_dir, identifier)
        } else {
            self.locate_package(base_dir, identifier)
        };

        match entry {
            Some(path) => {
                let path = std::fs::canonicalize(&path)?;
                debug!(identifier, path = %path.display(), "Resolved plugin entry");
                Ok(path)
            }
            None => Err(ResolveError::UnresolvablePlugin { identifier: identifier.to_string() }),
        }
    }

    /// Probe a local path: the file itself, a directory's descriptor, or
    /// the path with the descriptor extension appended.
    fn locate_local(&self, base_dir: &Path, identifier: &str) -> Option<PathBuf> {
        let candidate = base_dir.join(identifier);

        if candidate.is_file() {
            return Some(candidate);
        }

        if candidate.is_dir() {
            let descriptor = candidate.join(DESCRIPTOR_FILE);
            if descriptor.is_file() {
                return Some(descriptor);
            }
        }

        let with_extension = PathBuf::from(format!("{}.toml", candidate.display()));
        if with_extension.is_file() {
            return Some(with_extension);
        }

        None
    }

    /// Probe the package directories for `<dir>/<identifier>/plugin.toml`.
    fn locate_package(&self, base_dir: &Path, identifier: &str) -> Option<PathBuf> {
        let mut dirs = vec![base_dir.join(PROJECT_PACKAGES_DIR)];
        dirs.extend(self.extra_package_dirs.iter().cloned());
        if let Some(user_dir) = user_packages_dir() {
            dirs.push(user_dir);
        }

        for dir in dirs {
            let descriptor = dir.join(identifier).join(DESCRIPTOR_FILE);
            if descriptor.is_file() {
                return Some(descriptor);
            }
        }

        None
    }
}

fn is_local(identifier: &str) -> bool {
    identifier.starts_with("./") || identifier.starts_with("../")
}
