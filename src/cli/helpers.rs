//! Shared helper functions for CLI commands.

use console::style;

use crate::models::Sentiment;

/// Sentiment label colored for terminal output.
pub fn styled_sentiment(sentiment: Sentiment) -> String {
    match sentiment {
        Sentiment::Positive => style(sentiment).green().to_string(),
        Sentiment::Negative => style(sentiment).red().to_string(),
        Sentiment::Neutral => style(sentiment).cyan().to_string(),
        Sentiment::Error(_) => style(sentiment).yellow().bold().to_string(),
    }
}

/// Truncate a string for display, keeping whole characters.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
