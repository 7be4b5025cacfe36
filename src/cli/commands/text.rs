//! Single-text classification command.

use console::style;

use crate::config::Config;
use crate::llm::LlmClient;

use crate::cli::helpers::styled_sentiment;

/// Classify one string and print its label.
pub async fn cmd_text(config: &Config, text: &str) -> anyhow::Result<()> {
    let client = LlmClient::new(config.llm.clone())?;

    println!(
        "{} Classifying with {} (model: {})",
        style("→").cyan(),
        config.llm.endpoint,
        config.llm.model
    );

    let sentiment = client.classify(text).await;
    println!("{}", styled_sentiment(sentiment));
    Ok(())
}
