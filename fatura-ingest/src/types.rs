use serde::{Deserialize, Serialize};

/// Positioned piece of text as reported by the document decoder.
///
/// Coordinates are page space with Y growing upwards (top of page has the
/// largest Y). Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl TextFragment {
    pub fn new(page: u32, x: f64, y: f64, text: &str) -> Self {
        Self {
            page,
            x,
            y,
            text: text.to_string(),
        }
    }
}

/// Horizontal half of a two-column statement page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Right,
}

/// A visual line rebuilt from fragments sharing page, column and Y bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedLine {
    pub text: String,
    /// Leftmost fragment X
    pub x: f64,
    /// Quantised Y
    pub y: i64,
    pub page: u32,
    pub column: Column,
}
