//! Error types for fragment decoding and parser configuration.

use std::io;
use thiserror::Error;

/// The fragment source could not produce a usable document.
///
/// Always fatal for the whole parse; no partial result is built.
#[derive(Error, Debug)]
pub enum SourceError {
    /// I/O error when reading the fragment dump.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV fragment dump could not be decoded.
    #[error("CSV decoding error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON fragment dump could not be decoded.
    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A fragment decoded but carries impossible values.
    #[error("Malformed fragment #{index}: {reason}")]
    Malformed { index: usize, reason: String },

    /// The document yielded no text at all (scanned image, encrypted, ...).
    #[error("Document produced no text fragments")]
    Empty,
}

/// Invalid parser configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}
