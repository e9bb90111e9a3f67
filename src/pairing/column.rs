//! Column-aware pairing

use super::{pair_lines, PageLayout, PairingStrategy};
use crate::tagmap::TagQuantityMap;

/// Takes the first quantity on the line that does not sit in the tag's own
/// column. Two tokens are collocated only when both have a known column
/// index and the indices match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnIndexed;

impl PairingStrategy for ColumnIndexed {
    fn name(&self) -> &str {
        "column"
    }

    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap {
        let columns = &layout.columns;
        pair_lines(&layout.lines, |_, ident, candidates| {
            let tag_column = columns.column_index(ident.x);
            candidates
                .iter()
                .find(|c| {
                    let qty_column = columns.column_index(c.x);
                    !matches!((tag_column, qty_column), (Some(a), Some(b)) if a == b)
                })
                .map(|c| c.value)
        })
    }
}
