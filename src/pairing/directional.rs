//! Nearest quantity by pixel distance, right side first

use super::{pair_lines, PageLayout, PairingStrategy, QuantityCandidate};
use crate::tagmap::TagQuantityMap;

/// Default maximum horizontal distance between a tag and its quantity
pub const DEFAULT_MAX_PAIR_DISTANCE: f32 = 150.0;

/// Prefers the nearest quantity strictly to the right of the tag within
/// `max_distance`; falls back to the nearest one strictly to the left.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalNearest {
    max_distance: f32,
}

impl DirectionalNearest {
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    /// Nearest candidate on one side. `offset` returns the signed distance
    /// in the wanted direction (positive means on that side).
    fn nearest(
        &self,
        candidates: &[QuantityCandidate],
        offset: impl Fn(&QuantityCandidate) -> f32,
    ) -> Option<u32> {
        let mut best: Option<(f32, u32)> = None;
        for candidate in candidates {
            let dist = offset(candidate);
            if dist <= 0.0 || dist >= self.max_distance {
                continue;
            }
            // strict comparison keeps the first of equal distances
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, candidate.value));
            }
        }
        best.map(|(_, value)| value)
    }
}

impl Default for DirectionalNearest {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAIR_DISTANCE)
    }
}

impl PairingStrategy for DirectionalNearest {
    fn name(&self) -> &str {
        "directional"
    }

    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap {
        pair_lines(&layout.lines, |_, ident, candidates| {
            self.nearest(candidates, |c| c.x - ident.x)
                .or_else(|| self.nearest(candidates, |c| ident.x - c.x))
        })
    }
}
