//! # fab-core
//!
//! Core types and plugin contracts for the Fab bundle compiler.
//!
//! This crate provides:
//! - The parsed configuration model (`FabConfig`, `BuildConfig`, `PluginArgs`)
//! - The in-progress bundle (`ProtoFab`) and its finalized form (`Fab`)
//! - Published bundle metadata (`FabMetadata`, `FabFileMetadata`)
//! - The plugin capability interface (`FabPlugin`) and the
//!   `BuildStep` / `RuntimeSetup` / `Responder` traits
//!
//! ## Plugin Model
//!
//! A plugin module exposes up to two capabilities: a build step, which
//! mutates the shared `ProtoFab` during the build phase, and a runtime
//! setup, which is invoked once at serve time and returns a request
//! responder. A module exposing neither is valid but inert.

pub mod config;
pub mod error;
pub mod metadata;
pub mod plugin;
pub mod proto_fab;
pub mod request;

pub use config::{ArgValue, BuildConfig, FabConfig, FabSettings, PluginArgs};
pub use error::PluginError;
pub use metadata::{derive_file_metadata, FabFileMetadata, FabMetadata, FileMeta, PluginMetadata};
pub use plugin::{BuildStep, FabPlugin, Responder, RuntimeSetup};
pub use proto_fab::{BuildScope, Fab, FabFiles, ProtoFab};
pub use request::{FabRequest, FabResponse, RequestContext, ResponderOutcome};
