//! Token-order scoring

use super::{pair_lines, IdentifierMatch, PageLayout, PairingStrategy, QuantityCandidate};
use crate::tagmap::TagQuantityMap;

const GAP_PENALTY: i64 = 10;
const LEFT_NEIGHBOUR_BONUS: i64 = 50;
const RIGHT_NEIGHBOUR_BONUS: i64 = 30;
const MAX_GAP: usize = 3;
const FAR_PENALTY: i64 = 100;

/// Scores every quantity on the tag's line by token-index distance, with
/// bonuses for the immediate neighbours. Highest score wins, earliest
/// candidate on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoredAssignment;

/// Score of pairing `candidate` with `ident`
pub fn score(ident: &IdentifierMatch, candidate: &QuantityCandidate) -> i64 {
    let gap = ident.index.abs_diff(candidate.index);
    let mut score = -GAP_PENALTY * gap as i64;
    if candidate.index + 1 == ident.index {
        score += LEFT_NEIGHBOUR_BONUS;
    }
    if candidate.index == ident.index + 1 {
        score += RIGHT_NEIGHBOUR_BONUS;
    }
    if gap > MAX_GAP {
        score -= FAR_PENALTY;
    }
    score
}

impl PairingStrategy for ScoredAssignment {
    fn name(&self) -> &str {
        "scored"
    }

    fn pair_page(&self, layout: &PageLayout) -> TagQuantityMap {
        pair_lines(&layout.lines, |_, ident, candidates| {
            let mut best: Option<(i64, u32)> = None;
            for candidate in candidates {
                let s = score(ident, candidate);
                if best.map_or(true, |(b, _)| s > b) {
                    best = Some((s, candidate.value));
                }
            }
            best.map(|(_, value)| value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::layout;
    use super::*;

    #[test]
    fn test_scores() {
        let ident = IdentifierMatch {
            tag: "AB123-456".into(),
            x: 0.0,
            index: 2,
        };
        let at = |index| QuantityCandidate {
            value: 1,
            x: 0.0,
            index,
        };
        assert_eq!(score(&ident, &at(1)), 40);
        assert_eq!(score(&ident, &at(3)), 20);
        assert_eq!(score(&ident, &at(0)), -20);
        assert_eq!(score(&ident, &at(6)), -140);
    }

    #[test]
    fn test_left_neighbour_beats_right() {
        let page = layout(&[("4", 10.0, 0.0), ("AB123-456", 50.0, 0.0), ("2", 90.0, 0.0)]);
        assert_eq!(ScoredAssignment.pair_page(&page).get("AB123-456"), Some(4));
    }

    #[test]
    fn test_tolerates_small_gaps() {
        let page = layout(&[
            ("AB123-456", 10.0, 0.0),
            ("steel", 50.0, 0.0),
            ("2mm", 90.0, 0.0),
            ("6", 130.0, 0.0),
        ]);
        assert_eq!(ScoredAssignment.pair_page(&page).get("AB123-456"), Some(6));
    }

    #[test]
    fn test_far_candidate_still_chosen_when_alone() {
        let mut tokens = vec![("AB123-456", 0.0, 0.0)];
        let filler: Vec<String> = (0..120).map(|i| format!("w{i}")).collect();
        for (i, word) in filler.iter().enumerate() {
            tokens.push((word.as_str(), 10.0 + i as f32, 0.0));
        }
        tokens.push(("9", 500.0, 0.0));
        let page = layout(&tokens);
        assert_eq!(ScoredAssignment.pair_page(&page).get("AB123-456"), Some(9));
    }

    #[test]
    fn test_tie_keeps_earliest() {
        // both candidates two tokens away, no bonus
        let page = layout(&[
            ("5", 0.0, 0.0),
            ("x", 10.0, 0.0),
            ("AB123-456", 20.0, 0.0),
            ("y", 30.0, 0.0),
            ("8", 40.0, 0.0),
        ]);
        assert_eq!(ScoredAssignment.pair_page(&page).get("AB123-456"), Some(5));
    }
}
