//! End-to-end tests: config file → resolution → build → bundle on disk →
//! dispatcher constructed from the bundle → dispatched requests.

use fab_cli::commands;
use fab_cli::registry::builtin_registry;
use fab_core::FabRequest;
use fab_serve::{read_metadata, read_runtime_manifest, DispatchOutcome, RuntimeDispatcher};
use std::path::Path;
use tempfile::TempDir;

/// Lay out a project directory: config, plugin descriptors, and assets.
fn create_project(dir: &Path) {
    let write = |path: &str, content: &str| {
        let path = dir.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    };

    write(
        "fab.toml",
        r#"
runtime = ["./plugins/shell2"]

[build."./plugins/assets"]
dir = "public"

[build."./plugins/shell"]
title = "Integration Shell"

[build."./plugins/redirect-old"]
from = "^/old/(.*)$"
to = "/new/$1"
status = 301

[settings.production]
API_URL = "https://api.example.com"
"#,
    );

    write("plugins/assets/plugin.toml", "[plugin]\nimplementation = \"assets\"\n");
    write("plugins/shell/plugin.toml", "[plugin]\nimplementation = \"render-shell\"\n");
    write("plugins/shell2/plugin.toml", "[plugin]\nimplementation = \"render-shell\"\n");
    write(
        "plugins/redirect-old/plugin.toml",
        "[plugin]\nimplementation = \"redirects\"\n",
    );

    write("public/app.js", "console.log(1)");
    write("public/css/site.css", "body {}");
}

#[tokio::test]
async fn test_build_writes_complete_bundle() {
    let project = TempDir::new().unwrap();
    create_project(project.path());
    let bundle = project.path().join("fab_bundle");

    commands::build::run(&project.path().join("fab.toml"), &bundle)
        .await
        .unwrap();

    assert!(bundle.join("files/index.html").is_file());
    assert!(bundle.join("files/_assets/app.js").is_file());
    assert!(bundle.join("files/_assets/css/site.css").is_file());

    let metadata = read_metadata(&bundle).unwrap();
    assert_eq!(metadata.file_metadata["index.html"].content_type, "text/html; charset=utf-8");
    assert_eq!(
        metadata.plugin_metadata.get("./plugins/assets", "file_count"),
        Some(&serde_json::json!(2))
    );

    let manifest = read_runtime_manifest(&bundle).unwrap();
    let names: Vec<&str> = manifest.plugins.iter().map(|p| p.plugin_name.as_str()).collect();
    // Build-config entries first (in build order), then runtime-only ones.
    assert_eq!(
        names,
        vec!["./plugins/shell", "./plugins/redirect-old", "./plugins/shell2"]
    );
    assert_eq!(
        manifest.settings_for("production").get("API_URL").map(String::as_str),
        Some("https://api.example.com")
    );
}

#[tokio::test]
async fn test_dispatch_against_built_bundle() {
    let project = TempDir::new().unwrap();
    create_project(project.path());
    let bundle = project.path().join("fab_bundle");

    commands::build::run(&project.path().join("fab.toml"), &bundle)
        .await
        .unwrap();

    let metadata = read_metadata(&bundle).unwrap();
    let manifest = read_runtime_manifest(&bundle).unwrap();
    let registry = builtin_registry();
    let dispatcher = RuntimeDispatcher::new(&registry, &manifest.plugins, &metadata).unwrap();
    assert_eq!(dispatcher.responder_count(), 3);

    let settings = manifest.settings_for("production");

    // Navigation request: the shell responds first.
    let outcome = dispatcher
        .dispatch(FabRequest::get("https://example.com/"), &settings)
        .await
        .unwrap();
    match outcome {
        DispatchOutcome::Response(response) => {
            assert_eq!(response.status, 200);
            assert!(response.body_text().unwrap().contains("Integration Shell"));
        }
        DispatchOutcome::Unhandled => panic!("shell should handle navigation requests"),
    }

    // The shell declines paths with an extension, so the redirect plugin
    // (next in the chain) gets its turn.
    let outcome = dispatcher
        .dispatch(FabRequest::get("https://example.com/old/doc.html"), &settings)
        .await
        .unwrap();
    match outcome {
        DispatchOutcome::Response(response) => {
            assert_eq!(response.status, 301);
            assert_eq!(response.headers["Location"], "/new/doc.html");
        }
        DispatchOutcome::Unhandled => panic!("redirect plugin should handle /old/ paths"),
    }

    // Asset-style request nothing claims: unhandled, caller substitutes
    // the default response.
    let outcome = dispatcher
        .dispatch(FabRequest::get("https://example.com/missing.png"), &settings)
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Unhandled);
}

#[tokio::test]
async fn test_request_command_end_to_end() {
    let project = TempDir::new().unwrap();
    create_project(project.path());
    let bundle = project.path().join("fab_bundle");

    commands::build::run(&project.path().join("fab.toml"), &bundle)
        .await
        .unwrap();

    // The command prints rather than returns; success is the contract
    // exercised here, including the default 404 path.
    commands::request::run(&bundle, "https://example.com/", "GET", "production")
        .await
        .unwrap();
    commands::request::run(&bundle, "https://example.com/missing.png", "GET", "production")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_build_fails_for_unresolvable_plugin() {
    let project = TempDir::new().unwrap();
    create_project(project.path());
    std::fs::write(
        project.path().join("fab.toml"),
        "[build.\"./plugins/nonexistent\"]\n",
    )
    .unwrap();

    let result = commands::build::run(
        &project.path().join("fab.toml"),
        &project.path().join("fab_bundle"),
    )
    .await;
    assert!(result.is_err());
}
