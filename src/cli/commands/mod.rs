//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod batch;
mod models;
mod text;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::{Config, LoadOptions};

#[derive(Parser)]
#[command(name = "llm-sentiment")]
#[command(about = "Classify product review sentiment with a local LLM")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ollama API endpoint (overrides config and LLM_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Model name (overrides config and LLM_MODEL)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every review in the input CSV and write the augmented CSV
    Run {
        /// Input CSV (needs ProductID and ReviewText columns)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the endpoint availability check
        #[arg(long)]
        no_check: bool,
    },

    /// Classify a single piece of text and print the label
    Text {
        /// Review text to classify
        text: String,
    },

    /// List models available at the endpoint
    Models,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let config = Config::load_with_options(&options)
        .await
        .context("Failed to load configuration")?
        .with_cli_overrides(None, None, cli.endpoint.as_deref(), cli.model.as_deref());

    match &config.source_path {
        Some(path) => tracing::info!("Using config file {}", path.display()),
        None => tracing::debug!("No config file found, using defaults and environment"),
    }

    match cli.command {
        Commands::Run {
            input,
            output,
            no_check,
        } => {
            let config = config.with_cli_overrides(input, output, None, None);
            batch::cmd_run(&config, !no_check).await
        }
        Commands::Text { text } => text::cmd_text(&config, &text).await,
        Commands::Models => models::cmd_models(&config).await,
    }
}
