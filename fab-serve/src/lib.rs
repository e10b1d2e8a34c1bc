//! # fab-serve
//!
//! Serve-time half of the Fab bundle compiler.
//!
//! This crate provides:
//! - The runtime dispatcher: loads each runtime plugin once, obtains its
//!   responder, and walks the ordered responder chain per request
//! - Bundle artifact I/O: writing the built bundle to a directory and
//!   reading the published metadata and runtime manifest back at serve
//!   time
//!
//! No transport lives here: the embedding server hands requests to
//! [`RuntimeDispatcher::dispatch`] and writes the returned responses out
//! itself.

pub mod artifact;
pub mod dispatcher;

pub use artifact::{
    read_metadata, read_runtime_manifest, write_bundle, ArtifactError, RuntimeManifest,
    FILES_DIR, METADATA_FILE, RUNTIME_MANIFEST_FILE,
};
pub use dispatcher::{DispatchOutcome, RuntimeDispatcher, ServeError};
