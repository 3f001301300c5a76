//! Layout reconstruction: fragments to visual lines, lines to reading order.
//!
//! Statement pages are printed in two columns. Fragments are split at a fixed
//! X threshold, bucketed by Y to absorb rendering jitter, and each column is
//! read top to bottom before moving on to the next column and page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::types::{Column, ReconstructedLine, TextFragment};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fragments with `x < column_split_x` belong to the left column
    pub column_split_x: f64,
    /// Vertical bucket size used to merge fragments into one line
    pub y_bucket: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_split_x: 300.0,
            y_bucket: 3.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.column_split_x.is_finite() {
            return Err(ConfigError::InvalidLayout(
                "column_split_x must be a finite number".into(),
            ));
        }
        // Below one unit, neighbouring buckets would round to the same line Y
        if !(self.y_bucket.is_finite() && self.y_bucket >= 1.0) {
            return Err(ConfigError::InvalidLayout(format!(
                "y_bucket must be at least 1.0, got {}",
                self.y_bucket
            )));
        }
        Ok(())
    }

    /// A fragment exactly on the threshold is on the right.
    pub fn column_for(&self, x: f64) -> Column {
        if x < self.column_split_x {
            Column::Left
        } else {
            Column::Right
        }
    }

    /// Index of the Y bucket, rounding halves upwards.
    fn bucket_index(&self, y: f64) -> i64 {
        (y / self.y_bucket + 0.5).floor() as i64
    }

    fn bucket_y(&self, index: i64) -> i64 {
        (index as f64 * self.y_bucket).round() as i64
    }
}

/// Group fragments into lines by (page, column, Y bucket).
///
/// Output order is not meaningful; see [`sequence_lines`].
pub fn reconstruct_lines(fragments: &[TextFragment], config: &LayoutConfig) -> Vec<ReconstructedLine> {
    let mut groups: BTreeMap<(u32, Column, i64), Vec<&TextFragment>> = BTreeMap::new();

    for frag in fragments {
        if frag.text.trim().is_empty() {
            continue;
        }
        let key = (frag.page, config.column_for(frag.x), config.bucket_index(frag.y));
        groups.entry(key).or_default().push(frag);
    }

    let mut lines = Vec::with_capacity(groups.len());
    for ((page, column, bucket), mut items) in groups {
        items.sort_by(|a, b| a.x.total_cmp(&b.x));

        let text = items
            .iter()
            .flat_map(|f| f.text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }

        let x = items.iter().map(|f| f.x).fold(f64::INFINITY, f64::min);
        lines.push(ReconstructedLine {
            text,
            x,
            y: config.bucket_y(bucket),
            page,
            column,
        });
    }

    lines
}

/// Put lines in reading order: page, then left column before right, then top to bottom.
pub fn sequence_lines(mut lines: Vec<ReconstructedLine>) -> Vec<ReconstructedLine> {
    lines.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(a.column.cmp(&b.column))
            .then(b.y.cmp(&a.y))
    });
    lines
}

/// Reconstruct and sequence in one step.
pub fn layout_lines(fragments: &[TextFragment], config: &LayoutConfig) -> Vec<ReconstructedLine> {
    sequence_lines(reconstruct_lines(fragments, config))
}
