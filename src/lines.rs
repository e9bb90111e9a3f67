//! Line clustering by quantized baseline

use crate::tokens::Token;
use std::collections::BTreeMap;

/// Default vertical tolerance: tokens whose y rounds to the same multiple
/// of this value are on one printed row. Halves round to even.
pub const DEFAULT_LINE_TOLERANCE: f32 = 5.0;

/// A line of text (tokens sharing a quantized y)
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Quantized y of the line
    pub y: f32,
    /// Tokens sorted left to right
    pub tokens: Vec<Token>,
}

impl Line {
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Group one page's tokens into lines.
///
/// Lines come back ordered top to bottom (ascending quantized y), tokens
/// within a line left to right. Tokens with identical x keep their
/// extraction order.
pub fn cluster_lines(tokens: &[Token], tolerance: f32) -> Vec<Line> {
    let tolerance = if tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_LINE_TOLERANCE
    };

    let mut buckets: BTreeMap<i64, Vec<Token>> = BTreeMap::new();
    for token in tokens {
        if !token.x.is_finite() || !token.y.is_finite() {
            log::debug!("Dropping token with non-finite position: {:?}", token.text);
            continue;
        }
        let key = (token.y / tolerance).round_ties_even() as i64;
        buckets.entry(key).or_default().push(token.clone());
    }

    buckets
        .into_iter()
        .map(|(key, mut tokens)| {
            tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
            Line {
                y: key as f32 * tolerance,
                tokens,
            }
        })
        .collect()
}
