//! Review records read from input and their classified counterparts.

use serde::{Deserialize, Serialize};

use super::sentiment::Sentiment;

/// A single review row from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ReviewText")]
    pub review_text: String,
}

impl ReviewRecord {
    pub fn new(product_id: impl Into<String>, review_text: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            review_text: review_text.into(),
        }
    }

    /// Pair this record with its classification.
    pub fn classified(self, sentiment: Sentiment) -> ClassifiedReview {
        ClassifiedReview {
            product_id: self.product_id,
            review_text: self.review_text,
            sentiment,
        }
    }
}

/// A review together with the sentiment assigned to it. Field order is the
/// output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedReview {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ReviewText")]
    pub review_text: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
}
