//! Model listing command.

use console::style;

use crate::config::Config;
use crate::llm::LlmClient;

/// List models available at the configured endpoint.
pub async fn cmd_models(config: &Config) -> anyhow::Result<()> {
    let client = LlmClient::new(config.llm.clone())?;

    let models = match client.list_models().await {
        Ok(models) => models,
        Err(e) => {
            println!(
                "{} Could not list models at {}: {}",
                style("✗").red(),
                config.llm.endpoint,
                e
            );
            println!("  Make sure Ollama is running: ollama serve");
            return Err(e.into());
        }
    };

    if models.is_empty() {
        println!("{} No models installed", style("!").yellow());
        println!("  Pull one with: ollama pull {}", config.llm.model);
        return Ok(());
    }

    for name in &models {
        let marker = if *name == config.llm.model {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}", marker, name);
    }

    if !models.iter().any(|m| *m == config.llm.model) {
        println!(
            "{} Configured model {} is not installed",
            style("!").yellow(),
            config.llm.model
        );
    }

    Ok(())
}
