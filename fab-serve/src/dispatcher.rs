//! The runtime dispatcher.
//!
//! Constructed once per deployed bundle: every runtime plugin's module is
//! loaded, its setup invoked with that plugin's arguments and the
//! published plugin metadata, and the resulting responders retained in
//! registration order. The dispatcher is immutable afterwards and safely
//! shared across concurrent requests.
//!
//! Per request, responders are tried strictly in order: the first one
//! that responds wins and later responders are not invoked. A responder
//! failure aborts the dispatch; it is never treated as a decline.

use fab_core::{
    FabMetadata, FabRequest, FabResponse, FabSettings, PluginError, RequestContext, Responder,
    ResponderOutcome,
};
use fab_runtime::{ModuleLoader, ResolveError, ResolvedRuntimePlugin};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Errors from dispatcher construction or request dispatch.
#[derive(Error, Debug)]
pub enum ServeError {
    /// A runtime manifest entry failed to load as a module.
    #[error("failed to load runtime module: {0}")]
    Load(#[from] ResolveError),

    /// A runtime manifest entry's module has no runtime export.
    #[error("runtime module at {} has no runtime export", entry_path.display())]
    NotRuntimeCapable { entry_path: PathBuf },

    /// A plugin's runtime setup failed.
    #[error("runtime setup for plugin {plugin_name} failed: {source}")]
    Setup {
        plugin_name: String,
        #[source]
        source: PluginError,
    },

    /// The request URL does not parse.
    #[error("invalid request URL {url}: {source}")]
    InvalidRequestUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A responder raised during dispatch.
    #[error("responder for plugin {plugin_name} failed: {source}")]
    Responder {
        plugin_name: String,
        #[source]
        source: PluginError,
    },
}

/// Result of dispatching one request through the responder chain.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A responder produced this response.
    Response(FabResponse),

    /// Every responder declined. Not an error at this layer: the
    /// outermost caller guarantees coverage or substitutes a default
    /// error response.
    Unhandled,
}

struct ResponderEntry {
    plugin_name: String,
    responder: Arc<dyn Responder>,
}

/// The ordered responder chain for one deployed bundle.
pub struct RuntimeDispatcher {
    responders: Vec<ResponderEntry>,
}

impl RuntimeDispatcher {
    /// Load every runtime plugin and collect its responder, in manifest
    /// order.
    pub fn new(
        loader: &dyn ModuleLoader,
        runtime_plugins: &[ResolvedRuntimePlugin],
        metadata: &FabMetadata,
    ) -> Result<Self, ServeError> {
        let mut responders = Vec::with_capacity(runtime_plugins.len());

        for plugin in runtime_plugins {
            let module = loader.load(&plugin.entry_path)?;
            let setup = module.runtime_setup().ok_or_else(|| ServeError::NotRuntimeCapable {
                entry_path: plugin.entry_path.clone(),
            })?;

            let responder = setup
                .setup(&plugin.plugin_args, &metadata.plugin_metadata)
                .map_err(|source| ServeError::Setup {
                    plugin_name: plugin.plugin_name.clone(),
                    source,
                })?;

            info!(plugin = %plugin.plugin_name, "Registered responder");
            responders.push(ResponderEntry { plugin_name: plugin.plugin_name.clone(), responder });
        }

        Ok(Self { responders })
    }

    /// Number of registered responders.
    pub fn responder_count(&self) -> usize {
        self.responders.len()
    }

    /// Dispatch one request through the responder chain.
    pub async fn dispatch(
        &self,
        request: FabRequest,
        settings: &FabSettings,
    ) -> Result<DispatchOutcome, ServeError> {
        let url = Url::parse(&request.url).map_err(|source| ServeError::InvalidRequestUrl {
            url: request.url.clone(),
            source,
        })?;

        let ctx = RequestContext { request, settings: settings.clone(), url };

        for entry in &self.responders {
            let outcome = entry.responder.respond(&ctx).await.map_err(|source| {
                ServeError::Responder { plugin_name: entry.plugin_name.clone(), source }
            })?;

            match outcome {
                ResponderOutcome::Respond(response) => {
                    debug!(plugin = %entry.plugin_name, status = response.status, "Request handled");
                    return Ok(DispatchOutcome::Response(response));
                }
                ResponderOutcome::Decline => continue,
            }
        }

        debug!(url = %ctx.url, "No responder handled the request");
        Ok(DispatchOutcome::Unhandled)
    }
}
