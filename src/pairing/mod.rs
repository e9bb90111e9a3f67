//! Tag/quantity pairing strategies
//!
//! Every strategy consumes the same [`PageLayout`] and returns a page-local
//! [`TagQuantityMap`]. They are alternatives resolving the same ambiguity
//! (which quantity on a line belongs to which tag), not pipeline stages.
//!
//! Shared rules:
//! - a tag with no acceptable candidate gets no entry from that strategy;
//! - several tags on one line are paired independently and may reuse the
//!   same quantity candidate;
//! - within a page, the first pairing of a tag (line order, then left to
//!   right) wins.

mod adjacent;
mod column;
mod directional;
mod header;
mod pattern;
mod scored;

pub use adjacent::AdjacentToken;
pub use column::ColumnIndexed;
pub use directional::{DirectionalNearest, DEFAULT_MAX_PAIR_DISTANCE};
pub use header::{
    HeaderAnchored, HeaderAnchors, HeaderRole, HeaderVocabulary, DEFAULT_HEADER_SCAN_LINES,
    DEFAULT_HEADER_TOLERANCE,
};
pub use pattern::{PatternAdjacency, PatternVariant};
pub use scored::ScoredAssignment;

use crate::columns::ColumnModel;
use crate::lines::{cluster_lines, Line};
use crate::pipeline::ExtractionConfig;
use crate::recognize::{recognize_quantity, recognize_tag};
use crate::tagmap::TagQuantityMap;
use crate::tokens::Page;
use crate::{Error, Result};

/// A pairing algorithm
pub trait PairingStrategy: Send + Sync {
    /// Stable strategy name, used for reporting and ensemble tie-breaks
    fn name(&self) -> &str;

    /// Pair tags with quantities on one page
    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap;
}

/// Everything a strategy may look at for one page
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub page: u32,
    /// Lines, top to bottom
    pub lines: Vec<Line>,
    /// Recurring x positions of the page
    pub columns: ColumnModel,
    /// Raw reading-order text
    pub text: String,
}

impl PageLayout {
    pub fn build(page: &Page, config: &ExtractionConfig) -> Self {
        Self {
            page: page.number,
            lines: cluster_lines(&page.tokens, config.line_tolerance),
            columns: ColumnModel::build(&page.tokens, &config.columns),
            text: page.reading_text(),
        }
    }
}

/// A tag recognized on a line
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierMatch {
    pub tag: String,
    pub x: f32,
    /// Position of the token within its line
    pub index: usize,
}

/// A quantity candidate on a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityCandidate {
    pub value: u32,
    pub x: f32,
    /// Position of the token within its line
    pub index: usize,
}

/// Tags on a line, left to right
pub fn identifiers(line: &Line) -> Vec<IdentifierMatch> {
    line.tokens
        .iter()
        .enumerate()
        .filter_map(|(index, token)| {
            recognize_tag(&token.text).map(|tag| IdentifierMatch {
                tag,
                x: token.x,
                index,
            })
        })
        .collect()
}

/// Quantity candidates on a line, left to right
pub fn quantities(line: &Line) -> Vec<QuantityCandidate> {
    line.tokens
        .iter()
        .enumerate()
        .filter_map(|(index, token)| {
            recognize_quantity(&token.text).map(|value| QuantityCandidate {
                value,
                x: token.x,
                index,
            })
        })
        .collect()
}

/// Run a per-line pairing rule over every line of a page.
///
/// `choose` picks the quantity for one tag given the line's candidates.
pub(crate) fn pair_lines<'a, I, F>(lines: I, mut choose: F) -> TagQuantityMap
where
    I: IntoIterator<Item = &'a Line>,
    F: FnMut(&Line, &IdentifierMatch, &[QuantityCandidate]) -> Option<u32>,
{
    let mut map = TagQuantityMap::new();
    for line in lines {
        let tags = identifiers(line);
        if tags.is_empty() {
            continue;
        }
        let candidates = quantities(line);
        for ident in &tags {
            if map.contains(&ident.tag) {
                continue;
            }
            if let Some(quantity) = choose(line, ident, &candidates) {
                map.record(ident.tag.as_str(), quantity);
            }
        }
    }
    map
}

/// The available strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    DirectionalNearest,
    AdjacentToken,
    HeaderAnchored,
    ColumnIndexed,
    ScoredAssignment,
    PatternTagThenQty,
    PatternQtyThenTag,
    PatternUnion,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::DirectionalNearest,
        StrategyKind::AdjacentToken,
        StrategyKind::HeaderAnchored,
        StrategyKind::ColumnIndexed,
        StrategyKind::ScoredAssignment,
        StrategyKind::PatternTagThenQty,
        StrategyKind::PatternQtyThenTag,
        StrategyKind::PatternUnion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::DirectionalNearest => "directional",
            StrategyKind::AdjacentToken => "adjacent",
            StrategyKind::HeaderAnchored => "header",
            StrategyKind::ColumnIndexed => "column",
            StrategyKind::ScoredAssignment => "scored",
            StrategyKind::PatternTagThenQty => "pattern-tag-qty",
            StrategyKind::PatternQtyThenTag => "pattern-qty-tag",
            StrategyKind::PatternUnion => "pattern-union",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::UnknownStrategy(name.to_string()))
    }

    pub fn build(self, config: &ExtractionConfig) -> Box<dyn PairingStrategy> {
        match self {
            StrategyKind::DirectionalNearest => {
                Box::new(DirectionalNearest::new(config.max_pair_distance))
            }
            StrategyKind::AdjacentToken => Box::new(AdjacentToken),
            StrategyKind::HeaderAnchored => Box::new(HeaderAnchored::new(
                config.header_vocabulary.clone(),
                config.header_scan_lines,
                config.header_tolerance,
            )),
            StrategyKind::ColumnIndexed => Box::new(ColumnIndexed),
            StrategyKind::ScoredAssignment => Box::new(ScoredAssignment),
            StrategyKind::PatternTagThenQty => {
                Box::new(PatternAdjacency::new(PatternVariant::TagThenQty))
            }
            StrategyKind::PatternQtyThenTag => {
                Box::new(PatternAdjacency::new(PatternVariant::QtyThenTag))
            }
            StrategyKind::PatternUnion => Box::new(PatternAdjacency::new(PatternVariant::Union)),
        }
    }
}

/// Build every strategy in [`StrategyKind::ALL`] order
pub fn all_strategies(config: &ExtractionConfig) -> Vec<Box<dyn PairingStrategy>> {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| kind.build(config))
        .collect()
}
