//! Implicit column detection from recurring x positions
//!
//! No ruling lines are used: an x position that many tokens share (after
//! snapping to a coarse grid) is taken as a column.

use crate::tokens::Token;
use std::collections::BTreeMap;

/// Column model of a page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnModel {
    /// Retained column x positions, ascending
    columns: Vec<f32>,
    /// Max distance from a column for `column_index` to match
    tolerance: f32,
}

/// Column detection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSettings {
    /// Grid spacing x positions are snapped to
    pub grid: f32,
    /// Minimum number of tokens on a grid value for it to count as a column
    pub min_count: usize,
    /// Match tolerance for `column_index`
    pub tolerance: f32,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            grid: 10.0,
            min_count: 3,
            tolerance: 15.0,
        }
    }
}

impl ColumnModel {
    /// Build the column model for one page's tokens
    pub fn build(tokens: &[Token], settings: &ColumnSettings) -> Self {
        let grid = if settings.grid > 0.0 { settings.grid } else { 10.0 };

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for token in tokens.iter().filter(|t| t.x.is_finite()) {
            *counts.entry((token.x / grid).round_ties_even() as i64).or_insert(0) += 1;
        }

        let columns = counts
            .into_iter()
            .filter(|(_, count)| *count >= settings.min_count)
            .map(|(key, _)| key as f32 * grid)
            .collect();

        Self {
            columns,
            tolerance: settings.tolerance,
        }
    }

    pub fn columns(&self) -> &[f32] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the nearest column strictly closer than the tolerance; ties
    /// go to the left column
    pub fn column_index(&self, x: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, &col) in self.columns.iter().enumerate() {
            let dist = (x - col).abs();
            if dist >= self.tolerance {
                continue;
            }
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
        best.map(|(idx, _)| idx)
    }
}
