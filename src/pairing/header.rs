//! Header-anchored pairing
//!
//! Looks for a table header near the top of the page ("Qty", "Item", ...)
//! and uses the header tokens' x positions as column anchors for the rows
//! below it.

use super::{identifiers, quantities, PageLayout, PairingStrategy, QuantityCandidate};
use crate::lines::Line;
use crate::tagmap::TagQuantityMap;
use std::collections::{BTreeSet, HashMap};

/// Leading lines searched for a header
pub const DEFAULT_HEADER_SCAN_LINES: usize = 15;

/// Max x distance between a value and the header word above it
pub const DEFAULT_HEADER_TOLERANCE: f32 = 30.0;

/// Logical role of a header word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderRole {
    /// Heads the quantity column
    Quantity,
    /// Heads the tag / item column
    Tag,
}

/// Recognized header words per role, stored lowercase
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVocabulary {
    words: HashMap<HeaderRole, BTreeSet<String>>,
}

impl HeaderVocabulary {
    pub fn empty() -> Self {
        Self {
            words: HashMap::new(),
        }
    }

    pub fn with_words<I, S>(mut self, role: HeaderRole, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.words.entry(role).or_default();
        set.extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn words(&self, role: HeaderRole) -> impl Iterator<Item = &str> {
        self.words
            .get(&role)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Role of a token, if it holds a header word. The token is split on
    /// non-alphanumeric characters (`QTY/EA`, `Qty(pcs)`) and each piece is
    /// compared whole and case-insensitively, so `account` is not `count`.
    /// A quantity word anywhere in the token wins over a tag word.
    pub fn role_of(&self, text: &str) -> Option<HeaderRole> {
        let pieces: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|piece| !piece.is_empty())
            .map(str::to_lowercase)
            .collect();
        [HeaderRole::Quantity, HeaderRole::Tag].into_iter().find(|role| {
            self.words
                .get(role)
                .is_some_and(|set| pieces.iter().any(|piece| set.contains(piece)))
        })
    }
}

impl Default for HeaderVocabulary {
    fn default() -> Self {
        Self::empty()
            .with_words(
                HeaderRole::Quantity,
                [
                    "qty", "quantity", "quantite", "quantité", "qte", "qté", "qtee", "nb",
                    "nombre", "count", "pcs", "pieces", "units", "amt",
                ],
            )
            .with_words(
                HeaderRole::Tag,
                [
                    "item", "tag", "part", "piece", "file", "filename", "fichier", "name",
                    "ref", "drawing", "dxf",
                ],
            )
    }
}

/// Header position found on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderAnchors {
    /// Index of the header line in the page's lines
    pub line: usize,
    /// x of the quantity header word
    pub quantity_x: Option<f32>,
    /// x of the tag header word
    pub tag_x: Option<f32>,
}

/// Pairs rows below a detected header, preferring the quantity sitting
/// under the quantity heading. Pages without a header fall back to the
/// first quantity on each line.
#[derive(Debug, Clone)]
pub struct HeaderAnchored {
    vocabulary: HeaderVocabulary,
    scan_lines: usize,
    tolerance: f32,
}

impl HeaderAnchored {
    pub fn new(vocabulary: HeaderVocabulary, scan_lines: usize, tolerance: f32) -> Self {
        Self {
            vocabulary,
            scan_lines,
            tolerance,
        }
    }

    /// Find the header within the first `scan_lines` lines.
    ///
    /// A line with a quantity heading wins; otherwise the first line with a
    /// tag heading is used, giving only a tag anchor.
    pub fn find_header(&self, lines: &[Line]) -> Option<HeaderAnchors> {
        let window = &lines[..lines.len().min(self.scan_lines)];
        let anchors_of = |idx: usize, line: &Line| {
            let x_of = |role| {
                line.tokens
                    .iter()
                    .find(|t| self.vocabulary.role_of(&t.text) == Some(role))
                    .map(|t| t.x)
            };
            HeaderAnchors {
                line: idx,
                quantity_x: x_of(HeaderRole::Quantity),
                tag_x: x_of(HeaderRole::Tag),
            }
        };

        let candidates: Vec<HeaderAnchors> = window
            .iter()
            .enumerate()
            .map(|(idx, line)| anchors_of(idx, line))
            .collect();

        candidates
            .iter()
            .find(|a| a.quantity_x.is_some())
            .or_else(|| candidates.iter().find(|a| a.tag_x.is_some()))
            .copied()
    }

    fn choose(
        &self,
        candidates: &[QuantityCandidate],
        anchors: Option<&HeaderAnchors>,
    ) -> Option<u32> {
        let near = |anchor: Option<f32>, c: &QuantityCandidate| {
            anchor.is_some_and(|x| (c.x - x).abs() <= self.tolerance)
        };
        let quantity_x = anchors.and_then(|a| a.quantity_x);
        let tag_x = anchors.and_then(|a| a.tag_x);

        if let Some(anchor) = quantity_x {
            let mut best: Option<(f32, u32)> = None;
            for c in candidates.iter().filter(|c| near(quantity_x, *c)) {
                let dist = (c.x - anchor).abs();
                if best.map_or(true, |(d, _)| dist < d) {
                    best = Some((dist, c.value));
                }
            }
            if let Some((_, value)) = best {
                return Some(value);
            }
        }

        // item numbers under the tag heading are not quantities
        candidates
            .iter()
            .find(|c| !near(tag_x, *c))
            .map(|c| c.value)
    }
}

impl Default for HeaderAnchored {
    fn default() -> Self {
        Self::new(
            HeaderVocabulary::default(),
            DEFAULT_HEADER_SCAN_LINES,
            DEFAULT_HEADER_TOLERANCE,
        )
    }
}

impl PairingStrategy for HeaderAnchored {
    fn name(&self) -> &str {
        "header"
    }

    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap {
        let anchors = self.find_header(&layout.lines);
        let first_row = anchors.map_or(0, |a| a.line + 1);
        if let Some(a) = &anchors {
            log::debug!(
                "Page {}: header on line {} (qty x {:?}, tag x {:?})",
                layout.page,
                a.line,
                a.quantity_x,
                a.tag_x
            );
        }

        let mut map = TagQuantityMap::new();
        for line in layout.lines.iter().skip(first_row) {
            let tags = identifiers(line);
            if tags.is_empty() {
                continue;
            }
            let candidates = quantities(line);
            let Some(quantity) = self.choose(&candidates, anchors.as_ref()) else {
                continue;
            };
            for ident in tags {
                map.record(ident.tag, quantity);
            }
        }
        map
    }
}
