//! # fab
//!
//! The Fab bundle compiler CLI.
//!
//! `fab build` compiles a declarative configuration (`fab.toml`) into a
//! deployable bundle: build plugins run in configuration order against a
//! shared bundle-in-progress, and runtime-capable plugins are recorded in
//! the bundle's runtime manifest.
//!
//! `fab request` loads a built bundle and dispatches a single request
//! through the ordered responder chain, printing the response.
//!
//! ## Running
//!
//! ```bash
//! fab build --config fab.toml --output fab_bundle
//! fab request https://example.com/ --bundle fab_bundle
//!
//! # With debug logging
//! RUST_LOG=debug fab build
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fab_cli::commands;

#[derive(Parser)]
#[command(name = "fab", version, about = "Compile declarative configs into deployable Fab bundles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a bundle from a configuration file.
    Build {
        /// Path to the configuration file.
        #[arg(long, default_value = "fab.toml")]
        config: PathBuf,

        /// Output bundle directory.
        #[arg(long, default_value = "fab_bundle")]
        output: PathBuf,
    },

    /// Dispatch a single request against a built bundle.
    Request {
        /// Request URL.
        url: String,

        /// Bundle directory.
        #[arg(long, default_value = "fab_bundle")]
        bundle: PathBuf,

        /// Request method.
        #[arg(long, default_value = "GET")]
        method: String,

        /// Settings environment.
        #[arg(long, default_value = "production")]
        env: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build { config, output } => commands::build::run(&config, &output).await,
        Command::Request { url, bundle, method, env } => {
            commands::request::run(&bundle, &url, &method, &env).await
        }
    }
}
