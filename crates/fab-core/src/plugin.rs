//! Plugin capability contracts.
//!
//! A plugin module exposes its capabilities through [`FabPlugin`]: an
//! optional build step and an optional runtime setup. The loader inspects
//! these typed accessors instead of probing an untyped module shape.

use crate::config::PluginArgs;
use crate::error::PluginError;
use crate::metadata::PluginMetadata;
use crate::proto_fab::BuildScope;
use crate::request::{RequestContext, ResponderOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// A plugin module's exported capabilities.
///
/// Returning `None` from both accessors is valid: such a module is inert
/// and the resolver skips it with a diagnostic.
pub trait FabPlugin: Send + Sync {
    /// The build-time capability, if the module exports one.
    fn build_step(&self) -> Option<Arc<dyn BuildStep>> {
        None
    }

    /// The serve-time capability, if the module exports one.
    fn runtime_setup(&self) -> Option<Arc<dyn RuntimeSetup>> {
        None
    }
}

/// A build step: mutates the shared bundle during the build phase.
///
/// Steps run strictly sequentially; a step may read metadata written by
/// earlier plugins and writes only into its own namespace.
#[async_trait]
pub trait BuildStep: Send + Sync {
    async fn build(&self, args: &PluginArgs, fab: &mut BuildScope<'_>) -> Result<(), PluginError>;
}

/// A runtime setup: invoked once at serve time with the plugin's arguments
/// and the published plugin metadata, synchronously returning a responder.
pub trait RuntimeSetup: Send + Sync {
    fn setup(
        &self,
        args: &PluginArgs,
        metadata: &PluginMetadata,
    ) -> Result<Arc<dyn Responder>, PluginError>;
}

/// A request responder: produces a response or declines.
///
/// An `Err` is a responder failure and aborts the dispatch; it is never
/// treated as a decline.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, ctx: &RequestContext) -> Result<ResponderOutcome, PluginError>;
}
