//! # plugin-redirects
//!
//! Runtime-only plugin issuing redirects for request paths matching a
//! configured pattern, declining everything else.
//!
//! Arguments:
//! - `from` (required): regex matched against the request path; capture
//!   groups are available in the target
//! - `to` (required): redirect target, `$n` references capture groups
//! - `status` (optional, default 302): redirect status code

use async_trait::async_trait;
use fab_core::{
    FabPlugin, FabResponse, PluginArgs, PluginError, PluginMetadata, RequestContext, Responder,
    ResponderOutcome, RuntimeSetup,
};
use regex::Regex;
use std::sync::Arc;

/// Path-redirect plugin.
pub struct RedirectsPlugin;

impl RedirectsPlugin {
    /// Create a new redirects plugin instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for RedirectsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FabPlugin for RedirectsPlugin {
    fn runtime_setup(&self) -> Option<Arc<dyn RuntimeSetup>> {
        Some(Arc::new(RedirectsSetup))
    }
}

struct RedirectsSetup;

impl RuntimeSetup for RedirectsSetup {
    fn setup(
        &self,
        args: &PluginArgs,
        _metadata: &PluginMetadata,
    ) -> Result<Arc<dyn Responder>, PluginError> {
        let from = args
            .str_arg("from")
            .ok_or_else(|| PluginError::msg("plugin-redirects requires a 'from' argument"))?;
        let to = args
            .str_arg("to")
            .ok_or_else(|| PluginError::msg("plugin-redirects requires a 'to' argument"))?
            .to_string();

        let status = args.int_arg("status").unwrap_or(302);
        if !(300..=399).contains(&status) {
            return Err(PluginError::msg(format!("invalid redirect status {status}")));
        }

        let pattern = Regex::new(from)
            .map_err(|e| PluginError::msg(format!("invalid 'from' pattern: {e}")))?;

        Ok(Arc::new(RedirectResponder { pattern, to, status: status as u16 }))
    }
}

struct RedirectResponder {
    pattern: Regex,
    to: String,
    status: u16,
}

#[async_trait]
impl Responder for RedirectResponder {
    async fn respond(&self, ctx: &RequestContext) -> Result<ResponderOutcome, PluginError> {
        let path = ctx.url.path();
        if !self.pattern.is_match(path) {
            return Ok(ResponderOutcome::Decline);
        }

        let location = self.pattern.replace(path, self.to.as_str()).into_owned();
        Ok(ResponderOutcome::Respond(FabResponse::redirect(self.status, location)))
    }
}
