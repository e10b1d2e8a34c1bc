//! Error type returned by plugin-supplied operations.

use thiserror::Error;

/// An error raised by a plugin's build step, runtime setup, or responder.
///
/// Failures carry through the orchestration layers unchanged; the
/// orchestrators wrap them with the offending plugin's name.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Plugin-specific failure.
    #[error("{0}")]
    Message(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PluginError {
    /// Construct a plugin-specific failure from any displayable message.
    pub fn msg(message: impl Into<String>) -> Self {
        PluginError::Message(message.into())
    }
}
