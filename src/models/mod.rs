//! Data models for review sentiment classification.

mod review;
pub mod sentiment;

pub use review::{ClassifiedReview, ReviewRecord};
pub use sentiment::{normalize_label, ErrorKind, Sentiment};
