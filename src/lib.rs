//! llm-sentiment - product review sentiment classification via a local LLM.
//!
//! Reads reviews from CSV, asks an Ollama-hosted model for a one-word
//! sentiment per review, and writes the labeled reviews back out as CSV.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod llm;
pub mod models;
pub mod services;
