//! Immediate-neighbour pairing

use super::{pair_lines, PageLayout, PairingStrategy};
use crate::recognize::recognize_quantity;
use crate::tagmap::TagQuantityMap;

/// Takes the quantity from the token right after the tag, else the token
/// right before it, else the first quantity anywhere on the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacentToken;

impl PairingStrategy for AdjacentToken {
    fn name(&self) -> &str {
        "adjacent"
    }

    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap {
        pair_lines(&layout.lines, |line, ident, candidates| {
            let neighbour = |index: Option<usize>| {
                index
                    .and_then(|i| line.tokens.get(i))
                    .and_then(|t| recognize_quantity(&t.text))
            };

            neighbour(Some(ident.index + 1))
                .or_else(|| neighbour(ident.index.checked_sub(1)))
                .or_else(|| candidates.first().map(|c| c.value))
        })
    }
}
