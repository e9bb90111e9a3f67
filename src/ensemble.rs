//! Majority vote across strategy outputs

use crate::tagmap::TagQuantityMap;
use std::collections::BTreeMap;

/// Votes one quantity received for one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityVotes {
    pub quantity: u32,
    /// Names of the strategies that produced this quantity, sorted
    pub strategies: Vec<String>,
}

impl QuantityVotes {
    pub fn count(&self) -> usize {
        self.strategies.len()
    }

    fn first_strategy(&self) -> &str {
        self.strategies.first().map(String::as_str).unwrap_or("")
    }
}

/// Per-tag vote tally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTable {
    /// Votes per tag, ordered by quantity
    votes: BTreeMap<String, Vec<QuantityVotes>>,
}

impl VoteTable {
    /// Tally every (tag, quantity) observed in the given strategy outputs
    pub fn tally<'a, I>(outputs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a TagQuantityMap)>,
    {
        let mut votes: BTreeMap<String, Vec<QuantityVotes>> = BTreeMap::new();
        for (strategy, map) in outputs {
            for (tag, quantity) in map.iter() {
                let entry = votes.entry(tag.to_string()).or_default();
                match entry.iter_mut().find(|v| v.quantity == quantity) {
                    Some(v) => v.strategies.push(strategy.to_string()),
                    None => entry.push(QuantityVotes {
                        quantity,
                        strategies: vec![strategy.to_string()],
                    }),
                }
            }
        }
        for entry in votes.values_mut() {
            for v in entry.iter_mut() {
                v.strategies.sort();
            }
            entry.sort_by_key(|v| v.quantity);
        }
        Self { votes }
    }

    pub fn get(&self, tag: &str) -> Option<&[QuantityVotes]> {
        self.votes.get(tag).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[QuantityVotes])> {
        self.votes.iter().map(|(t, v)| (t.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Tags whose strategies did not all agree
    pub fn disputed(&self) -> impl Iterator<Item = (&str, &[QuantityVotes])> {
        self.iter().filter(|(_, v)| v.len() > 1)
    }

    /// Winning quantity per tag: most votes, ties to the quantity backed by
    /// the lexicographically first strategy name.
    pub fn resolve(&self) -> TagQuantityMap {
        let mut merged = TagQuantityMap::new();
        for (tag, candidates) in &self.votes {
            let winner = candidates.iter().min_by(|a, b| {
                b.count()
                    .cmp(&a.count())
                    .then_with(|| a.first_strategy().cmp(b.first_strategy()))
                    .then_with(|| a.quantity.cmp(&b.quantity))
            });
            if let Some(winner) = winner {
                merged.record(tag.as_str(), winner.quantity);
            }
        }
        merged
    }
}

/// Ensemble output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsembleResult {
    pub merged: TagQuantityMap,
    pub votes: VoteTable,
}

/// Combine named strategy outputs by majority vote
pub fn combine<'a, I>(outputs: I) -> EnsembleResult
where
    I: IntoIterator<Item = (&'a str, &'a TagQuantityMap)>,
{
    let votes = VoteTable::tally(outputs);
    let merged = votes.resolve();
    log::debug!(
        "Ensemble: {} tags, {} disputed",
        merged.len(),
        votes.disputed().count()
    );
    EnsembleResult { merged, votes }
}
