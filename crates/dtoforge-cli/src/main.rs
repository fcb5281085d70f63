//! dtoforge - NestJS DTO planner.
//!
//! Reads an annotated schema document, computes the field bundles of every
//! DTO shape and writes them as a JSON manifest for the renderer.

mod config;
mod error;
mod output;

use clap::Parser;
use config::Args;
use dtoforge_core::{Generator, SchemaDocument};
use error::{CliError, Result};
use output::Manifest;
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr so --dry-run output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dtoforge=info,dtoforge_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "generation failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        schema = %args.schema.display(),
        "starting dtoforge"
    );

    let source = fs::read_to_string(&args.schema).map_err(|source| CliError::ReadSchema {
        path: args.schema.clone(),
        source,
    })?;
    let document = SchemaDocument::from_json(&source)?;

    let (config, diagnostics) = args.resolve(document.generator_options())?;
    for diagnostic in &diagnostics {
        tracing::warn!(kind = ?diagnostic.kind, "{}", diagnostic);
    }
    tracing::info!(
        output = %config.output.display(),
        layout = ?config.layout,
        file_style = %config.naming.file_style,
        "configuration loaded"
    );

    let registry = document.into_registry();
    let mut output = Generator::new(config.clone()).run(&registry)?;
    let generated = std::mem::take(&mut output.diagnostics);
    output.diagnostics = diagnostics.into_iter().chain(generated).collect();

    let manifest = Manifest::new(&config, &output);
    if args.dry_run {
        println!("{}", manifest.render()?);
    } else {
        manifest.write(&args.manifest_path())?;
    }
    Ok(())
}
