//! Regex adjacency over the page's reading-order text

use super::{PageLayout, PairingStrategy};
use crate::recognize::{canonicalize_tag, TAG_PATTERN};
use crate::tagmap::TagQuantityMap;
use once_cell::sync::Lazy;
use regex::Regex;

// The quantity is bounded by word boundaries so "1024" can never yield "102".
static TAG_THEN_QTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({})\s+([0-9]{{1,3}})\b", TAG_PATTERN)).unwrap()
});
static QTY_THEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b([0-9]{{1,3}})\s+({})", TAG_PATTERN)).unwrap()
});

/// Which textual order the pattern expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternVariant {
    /// `TAG 5`
    TagThenQty,
    /// `5 TAG`
    QtyThenTag,
    /// Tag-then-quantity pass first, then quantity-then-tag
    Union,
}

/// Whole-page regex pairing; ignores token positions entirely
#[derive(Debug, Clone, Copy)]
pub struct PatternAdjacency {
    variant: PatternVariant,
}

impl PatternAdjacency {
    pub fn new(variant: PatternVariant) -> Self {
        Self { variant }
    }
}

fn tag_then_qty(text: &str, map: &mut TagQuantityMap) {
    for caps in TAG_THEN_QTY_RE.captures_iter(text) {
        if let Ok(quantity) = caps[2].parse() {
            map.record(canonicalize_tag(&caps[1]), quantity);
        }
    }
}

fn qty_then_tag(text: &str, map: &mut TagQuantityMap) {
    for caps in QTY_THEN_TAG_RE.captures_iter(text) {
        if let Ok(quantity) = caps[1].parse() {
            map.record(canonicalize_tag(&caps[2]), quantity);
        }
    }
}

impl PairingStrategy for PatternAdjacency {
    fn name(&self) -> &str {
        match self.variant {
            PatternVariant::TagThenQty => "pattern-tag-qty",
            PatternVariant::QtyThenTag => "pattern-qty-tag",
            PatternVariant::Union => "pattern-union",
        }
    }

    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap {
        let mut map = TagQuantityMap::new();
        match self.variant {
            PatternVariant::TagThenQty => tag_then_qty(&layout.text, &mut map),
            PatternVariant::QtyThenTag => qty_then_tag(&layout.text, &mut map),
            PatternVariant::Union => {
                tag_then_qty(&layout.text, &mut map);
                qty_then_tag(&layout.text, &mut map);
            }
        }
        map
    }
}
