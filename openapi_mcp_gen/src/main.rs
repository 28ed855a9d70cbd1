//! Binary to generate MCP server sources from an OpenAPI document.
//!
//! Usage: `openapi-mcp-gen --doc openapi.json [--output dir] [--config settings.json]`
//!
//! Writes `<output>/src/types.ts` and `<output>/tools.json`. Logs go to stderr;
//! set `RUST_LOG` to change verbosity.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use openapi_mcp_gen::{GenerateSettings, ServerManifest, generate_from_file};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "openapi-mcp-gen",
    version,
    about = "Generate MCP server sources from Swagger/OpenAPI documents"
)]
struct Cli {
    /// Path to the OpenAPI JSON document
    #[arg(long)]
    doc: PathBuf,

    /// Output directory for the generated MCP server
    #[arg(long, default_value = "./generated-mcp-server")]
    output: PathBuf,

    /// Path to a JSON generation settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if !cli.doc.exists() {
        error!("document not found at {}", cli.doc.display());
        process::exit(1);
    }

    let settings: GenerateSettings = match cli.config.as_deref() {
        Some(path) => match GenerateSettings::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        },
        None => GenerateSettings::default(),
    };

    info!("generating MCP server from {}", cli.doc.display());
    let manifest: ServerManifest = match generate_from_file(&cli.doc, &cli.output, &settings) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("generation failed: {e}");
            process::exit(1);
        }
    };

    for tool in &manifest.tools {
        info!("  - {}: {}", tool.name, tool.description);
    }
    info!(
        "generated {} tools at {}",
        manifest.tools.len(),
        cli.output.display()
    );
}
