//! Tag to quantity mapping with first-seen insertion

use std::collections::BTreeMap;

/// Mapping from canonical tag to quantity.
///
/// `record` keeps the first quantity seen for a tag; later occurrences are
/// ignored. Iteration is sorted by tag so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuantityMap {
    entries: BTreeMap<String, u32>,
}

impl TagQuantityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the tag already has a quantity. Returns true if inserted.
    pub fn record(&mut self, tag: impl Into<String>, quantity: u32) -> bool {
        let tag = tag.into();
        if self.entries.contains_key(&tag) {
            return false;
        }
        self.entries.insert(tag, quantity);
        true
    }

    /// Insert or overwrite
    pub fn set(&mut self, tag: impl Into<String>, quantity: u32) -> Option<u32> {
        self.entries.insert(tag.into(), quantity)
    }

    /// Fold `later` into `self`, keeping existing quantities
    pub fn merge_first_seen(&mut self, later: &TagQuantityMap) {
        for (tag, &quantity) in &later.entries {
            self.record(tag.as_str(), quantity);
        }
    }

    pub fn get(&self, tag: &str) -> Option<u32> {
        self.entries.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(t, &q)| (t.as_str(), q))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for TagQuantityMap {
    /// First occurrence of each tag wins
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (tag, quantity) in iter {
            map.record(tag, quantity);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_wins() {
        let mut map = TagQuantityMap::new();
        assert!(map.record("ABC123-0001", 5));
        assert!(!map.record("ABC123-0001", 7));
        assert_eq!(map.get("ABC123-0001"), Some(5));
    }

    #[test]
    fn test_merge_keeps_earlier_pages() {
        let mut page1: TagQuantityMap = [("ABC123-0001", 5)].into_iter().collect();
        let page3: TagQuantityMap = [("ABC123-0001", 7), ("XY100-200", 2)].into_iter().collect();
        page1.merge_first_seen(&page3);
        assert_eq!(page1.get("ABC123-0001"), Some(5));
        assert_eq!(page1.get("XY100-200"), Some(2));
    }

    #[test]
    fn test_set_overwrites() {
        let mut map = TagQuantityMap::new();
        map.set("A", 1);
        assert_eq!(map.set("A", 2), Some(1));
        assert_eq!(map.get("A"), Some(2));
    }
}
