//! # plugin-render-shell
//!
//! A plugin exporting both capabilities: at build time it renders an HTML
//! application shell into the bundle and publishes the rendered document
//! in its metadata namespace; at serve time it responds to navigation
//! requests (paths without a file extension) with that document and
//! declines everything else.
//!
//! Build arguments:
//! - `title` (optional, default `Fab Application`): document title

use async_trait::async_trait;
use fab_core::{
    BuildScope, BuildStep, FabPlugin, FabResponse, PluginArgs, PluginError, PluginMetadata,
    RequestContext, Responder, ResponderOutcome, RuntimeSetup,
};
use serde_json::json;
use std::sync::Arc;

/// Bundle path of the rendered shell.
pub const SHELL_FILE: &str = "index.html";

/// Metadata key the rendered document is published under.
const HTML_KEY: &str = "shell_html";

/// Application-shell plugin.
pub struct RenderShellPlugin;

impl RenderShellPlugin {
    /// Create a new render-shell plugin instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for RenderShellPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FabPlugin for RenderShellPlugin {
    fn build_step(&self) -> Option<Arc<dyn BuildStep>> {
        Some(Arc::new(ShellBuild))
    }

    fn runtime_setup(&self) -> Option<Arc<dyn RuntimeSetup>> {
        Some(Arc::new(ShellSetup))
    }
}

fn render_shell(title: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<div id=\"app\"></div>\n</body>\n</html>\n"
    )
}

struct ShellBuild;

#[async_trait]
impl BuildStep for ShellBuild {
    async fn build(&self, args: &PluginArgs, fab: &mut BuildScope<'_>) -> Result<(), PluginError> {
        let title = args.str_arg("title").unwrap_or("Fab Application");
        let html = render_shell(title);

        fab.write_file(SHELL_FILE, html.clone());
        fab.set_metadata("file", json!(SHELL_FILE));
        fab.set_metadata("title", json!(title));
        fab.set_metadata(HTML_KEY, json!(html));
        Ok(())
    }
}

struct ShellSetup;

impl RuntimeSetup for ShellSetup {
    fn setup(
        &self,
        _args: &PluginArgs,
        metadata: &PluginMetadata,
    ) -> Result<Arc<dyn Responder>, PluginError> {
        // The configured identifier is not part of the setup contract, so
        // find the namespace this plugin's build step published into.
        let html = metadata
            .plugin_names()
            .find_map(|name| metadata.get(name, HTML_KEY))
            .and_then(|value| value.as_str())
            .map(str::to_string);

        Ok(Arc::new(ShellResponder { html }))
    }
}

struct ShellResponder {
    html: Option<String>,
}

#[async_trait]
impl Responder for ShellResponder {
    async fn respond(&self, ctx: &RequestContext) -> Result<ResponderOutcome, PluginError> {
        let Some(html) = &self.html else {
            return Ok(ResponderOutcome::Decline);
        };

        if is_navigation(ctx.url.path()) {
            let response = FabResponse::ok(html.clone())
                .with_header("Content-Type", "text/html; charset=utf-8");
            Ok(ResponderOutcome::Respond(response))
        } else {
            Ok(ResponderOutcome::Decline)
        }
    }
}

/// A path is a navigation target when its last segment has no extension.
fn is_navigation(path: &str) -> bool {
    match path.rsplit('/').next() {
        Some(segment) => !segment.contains('.'),
        None => true,
    }
}
