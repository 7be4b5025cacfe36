//! Batch classification command.

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::cli::helpers::{styled_sentiment, truncate};
use crate::config::Config;
use crate::llm::LlmClient;
use crate::services::{ClassificationEvent, ClassificationService};

/// Classify the configured input file and write the output file.
pub async fn cmd_run(config: &Config, check_endpoint: bool) -> anyhow::Result<()> {
    let client = LlmClient::new(config.llm.clone())?;
    let service = ClassificationService::new(client);

    // Input is validated before anything is sent to the endpoint.
    let prepared = service
        .prepare(&config.input, check_endpoint)
        .await
        .with_context(|| format!("Failed to process {}", config.input.display()))?;

    match prepared.endpoint_available {
        Some(true) => println!(
            "{} Connected to LLM at {} (model: {})",
            style("✓").green(),
            config.llm.endpoint,
            config.llm.model
        ),
        Some(false) => {
            // Reviews still get processed; each will end up as an API failure.
            println!(
                "{} LLM service not available at {}",
                style("!").yellow(),
                config.llm.endpoint
            );
            println!("  Make sure Ollama is running: ollama serve");
        }
        None => {}
    }

    let (event_tx, mut event_rx) = mpsc::channel::<ClassificationEvent>(100);

    // Spawn event handler for UI
    let event_handler = tokio::spawn(async move {
        let mut progress: Option<ProgressBar> = None;

        while let Some(event) = event_rx.recv().await {
            match event {
                ClassificationEvent::Started { total_reviews } => {
                    let pb = ProgressBar::new(total_reviews as u64);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▓░"),
                    );
                    pb.set_message("Classifying...");
                    progress = Some(pb);
                }
                ClassificationEvent::ReviewStarted {
                    product_id,
                    preview,
                    ..
                } => {
                    if let Some(ref pb) = progress {
                        pb.set_message(format!("{}: {}", product_id, truncate(&preview, 50)));
                    }
                }
                ClassificationEvent::ReviewCompleted {
                    product_id,
                    sentiment,
                    ..
                } => {
                    if let Some(ref pb) = progress {
                        if sentiment.is_error() {
                            pb.println(format!(
                                "{} {}: {}",
                                style("✗").red(),
                                product_id,
                                sentiment
                            ));
                        }
                        pb.inc(1);
                    }
                }
                ClassificationEvent::Complete { classified, errors } => {
                    if let Some(pb) = progress.take() {
                        pb.finish_and_clear();
                    }
                    println!(
                        "{} Analysis complete: {} reviews, {} errors",
                        style("✓").green(),
                        classified,
                        errors
                    );
                }
            }
        }
    });

    let outcome = service
        .classify_and_write(prepared.records, &config.output, event_tx)
        .await;

    // Wait for event handler to finish
    let _ = event_handler.await;

    if !outcome.results.is_empty() {
        println!("\nResults:");
        for result in &outcome.results {
            println!(
                "ProductID: {}, Sentiment: {}",
                result.product_id,
                styled_sentiment(result.sentiment)
            );
        }
    }

    match outcome.write_error {
        Some(e) => println!("\n{} {}", style("✗").red(), e),
        None if outcome.written => println!(
            "\n{} Results saved to '{}'",
            style("✓").green(),
            config.output.display()
        ),
        None => println!("\n{} No results to save", style("!").yellow()),
    }

    Ok(())
}
