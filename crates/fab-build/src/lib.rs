//! # fab-build
//!
//! Build orchestration for the Fab bundle compiler.
//!
//! Runs every resolved build-capable plugin, in configuration order,
//! against one exclusively-owned bundle-in-progress, then finalizes the
//! bundle: files are snapshotted and per-file metadata (content type and
//! length) is derived.

pub mod content_type;
pub mod orchestrator;

pub use content_type::content_type_for;
pub use orchestrator::{run_build, BuildError};
