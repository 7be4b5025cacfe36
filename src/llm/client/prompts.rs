//! Default LLM prompts for review classification.

/// Default prompt for classifying a product review (uses the {review_text} placeholder).
pub const DEFAULT_SENTIMENT_PROMPT: &str = r#"
Analyze the sentiment of the following product review.
Respond with only one word: Positive, Negative, or Neutral.

Review: "{review_text}"

Sentiment:"#;

/// Placeholder replaced by the review text.
pub const REVIEW_TEXT_PLACEHOLDER: &str = "{review_text}";
