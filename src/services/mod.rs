//! Service layer for review classification.
//!
//! Contains the business logic separated from UI concerns.

mod classify;

pub use classify::{
    preview, BatchOutcome, ClassificationEvent, ClassificationService, PreparedBatch,
};
