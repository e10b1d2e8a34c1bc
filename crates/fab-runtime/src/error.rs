//! Error types for plugin resolution.

use thiserror::Error;

/// Errors that can occur while locating, loading, or resolving plugins.
///
/// All of these are fatal to the resolution phase: the first failing
/// entry aborts resolution before any build step runs.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A configured identifier cannot be resolved to a loadable module.
    #[error("plugin {identifier} could not be resolved to a loadable module")]
    UnresolvablePlugin { identifier: String },

    /// A located entry module failed to load.
    #[error("failed to load plugin {identifier}: {source}")]
    LoadFailed {
        identifier: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// The entry descriptor is malformed.
    #[error("invalid plugin descriptor: {0}")]
    InvalidDescriptor(String),

    /// The descriptor names an implementation nothing has registered.
    #[error("plugin implementation '{implementation}' is not registered")]
    UnknownImplementation { implementation: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for resolution operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
