//! Policy Compose
//!
//! Command-line front end for policy composition: reads a TOML declaration
//! file plus optional base and override JSON documents, prints the canonical
//! document and its id.

use anyhow::Context;
use clap::Parser;
use policy_composer::{load_declarations, PolicyComposer};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "policy-compose")]
#[command(about = "Compose a canonical bucket or identity policy document")]
struct Args {
    /// TOML file with the local statement declarations
    #[arg(short = 'c', long)]
    config: PathBuf,

    /// JSON policy document the declarations are merged onto
    #[arg(short = 'b', long)]
    base: Option<PathBuf>,

    /// JSON policy document merged over the result
    #[arg(short = 'o', long = "override")]
    override_doc: Option<PathBuf>,

    /// Print only the document id
    #[arg(long)]
    id_only: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries the document
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    info!("Declarations: {:?}", args.config);
    let local = load_declarations(&args.config)
        .with_context(|| format!("Failed to load declarations from {:?}", args.config))?;

    let mut composer = PolicyComposer::new().local(local);

    if let Some(path) = &args.base {
        info!("Base document: {:?}", path);
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read base document {:?}", path))?;
        composer = composer.base_json(json);
    }

    if let Some(path) = &args.override_doc {
        info!("Override document: {:?}", path);
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read override document {:?}", path))?;
        composer = composer.override_json(json);
    }

    let composed = composer.compose().context("Failed to compose policy")?;

    if args.id_only {
        println!("{}", composed.id());
    } else {
        println!("{}", composed.json);
        println!("id: {}", composed.id());
    }

    Ok(())
}
