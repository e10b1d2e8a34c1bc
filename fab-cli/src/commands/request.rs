//! The `fab request` subcommand.
//!
//! Loads a built bundle, constructs the runtime dispatcher from its
//! runtime manifest and published metadata, dispatches one synthetic
//! request through the responder chain, and prints the response. When
//! every responder declines, a default 404 response is substituted here,
//! at the outermost caller.

use crate::registry::builtin_registry;
use anyhow::{Context, Result};
use fab_core::{FabRequest, FabResponse};
use fab_serve::{read_metadata, read_runtime_manifest, DispatchOutcome, RuntimeDispatcher};
use std::path::Path;

pub async fn run(bundle: &Path, url: &str, method: &str, env: &str) -> Result<()> {
    let metadata = read_metadata(bundle)
        .with_context(|| format!("Failed to read bundle metadata: {}", bundle.display()))?;
    let manifest = read_runtime_manifest(bundle)
        .with_context(|| format!("Failed to read runtime manifest: {}", bundle.display()))?;

    let registry = builtin_registry();
    let dispatcher = RuntimeDispatcher::new(&registry, &manifest.plugins, &metadata)
        .context("Failed to construct the runtime dispatcher")?;
    let settings = manifest.settings_for(env);

    let request = FabRequest {
        method: method.to_uppercase(),
        url: url.to_string(),
        headers: Default::default(),
        body: Vec::new(),
    };

    let response = match dispatcher.dispatch(request, &settings).await? {
        DispatchOutcome::Response(response) => response,
        DispatchOutcome::Unhandled => FabResponse::new(404)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body("404: no responder handled this request\n"),
    };

    println!("HTTP {}", response.status);
    for (name, value) in &response.headers {
        println!("{name}: {value}");
    }
    if !response.body.is_empty() {
        println!();
        match response.body_text() {
            Some(text) => print!("{text}"),
            None => println!("<{} binary bytes>", response.body.len()),
        }
    }
    Ok(())
}
