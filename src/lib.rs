//! Tag/quantity extraction from positioned page text
//!
//! This crate provides:
//! - Line and column reconstruction from a bag of positioned tokens
//! - Several competing strategies for pairing part tags with quantities
//! - Majority-vote combination of the strategies' results
//! - Benchmarking against a ground-truth list

pub mod columns;
pub mod ensemble;
pub mod evaluate;
pub mod lines;
pub mod pairing;
pub mod pipeline;
pub mod recognize;
pub mod reference;
pub mod tagmap;
pub mod tokens;

pub use columns::{ColumnModel, ColumnSettings};
pub use ensemble::{combine, EnsembleResult, QuantityVotes, VoteTable};
pub use evaluate::{
    evaluate, rank_reports, tag_set_metrics, EvaluationReport, QuantityMismatch, TagSetMetrics,
};
pub use lines::{cluster_lines, Line};
pub use pairing::{all_strategies, PageLayout, PairingStrategy, StrategyKind};
pub use pipeline::{extract_document, run_strategy, DocumentExtraction, ExtractionConfig};
pub use recognize::{recognize_quantity, recognize_tag};
pub use reference::{load_reference, parse_reference, Reference};
pub use tagmap::TagQuantityMap;
pub use tokens::{load_tokens, load_tokens_mem, Document, Page, Token};

use std::path::Path;

/// Load a token dump and run every strategy over it with default settings
pub fn process_tokens<P: AsRef<Path>>(path: P) -> Result<DocumentExtraction> {
    let document = load_tokens(path)?;
    let config = ExtractionConfig::default();
    extract_document(&document, &all_strategies(&config), &config)
}

/// Same as [`process_tokens`] for a dump held in memory
pub fn process_tokens_mem(content: &str) -> Result<DocumentExtraction> {
    let document = load_tokens_mem(content)?;
    let config = ExtractionConfig::default();
    extract_document(&document, &all_strategies(&config), &config)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid token record on line {line}: {reason}")]
    InvalidTokenRecord { line: usize, reason: String },
    #[error("Unknown strategy '{0}'")]
    UnknownStrategy(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
