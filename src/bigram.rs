//! Bigram co-occurrence index.
//!
//! Counts ordered pairs of adjacent corpus words and answers neighbor queries
//! from either side:
//!
//! ```text
//!   "the cat"  "the dog"  "a cat"
//!
//!   after["the"]  = {cat: 1, dog: 1}      before["cat"] = {the: 1, a: 1}
//!   after["a"]    = {cat: 1}              before["dog"] = {the: 1}
//! ```
//!
//! The two maps are updated together, so `count(w1, w2)` read through either
//! one agrees.

use std::collections::{BTreeSet, HashMap};

/// Which neighbors of a word to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Words appearing immediately before.
    Before,
    /// Words appearing immediately after.
    After,
}

/// Directed adjacency counts between corpus words.
#[derive(Debug, Clone, Default)]
pub struct BigramIndex {
    /// word → (following word → count)
    after: HashMap<String, HashMap<String, u32>>,
    /// word → (preceding word → count)
    before: HashMap<String, HashMap<String, u32>>,
    total: u64,
}

impl BigramIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `first` immediately followed by `second`.
    pub fn add(&mut self, first: &str, second: &str) {
        *self
            .after
            .entry(first.to_string())
            .or_default()
            .entry(second.to_string())
            .or_insert(0) += 1;
        *self
            .before
            .entry(second.to_string())
            .or_default()
            .entry(first.to_string())
            .or_insert(0) += 1;
        self.total += 1;
    }

    /// Record every adjacent pair in `tokens`.
    pub fn add_sequence<S: AsRef<str>>(&mut self, tokens: &[S]) {
        for pair in tokens.windows(2) {
            self.add(pair[0].as_ref(), pair[1].as_ref());
        }
    }

    /// Whether `first second` was seen.
    pub fn exists(&self, first: &str, second: &str) -> bool {
        self.count(first, second) > 0
    }

    /// Occurrences of `first second`, read from the forward map.
    pub fn count(&self, first: &str, second: &str) -> u32 {
        self.after
            .get(first)
            .and_then(|next| next.get(second))
            .copied()
            .unwrap_or(0)
    }

    /// Occurrences of `first second`, read from the backward map.
    pub fn count_backward(&self, first: &str, second: &str) -> u32 {
        self.before
            .get(second)
            .and_then(|prev| prev.get(first))
            .copied()
            .unwrap_or(0)
    }

    fn side(&self, direction: Direction) -> &HashMap<String, HashMap<String, u32>> {
        match direction {
            Direction::After => &self.after,
            Direction::Before => &self.before,
        }
    }

    /// Neighbors of `word` on the given side.
    pub fn neighbors(&self, word: &str, direction: Direction) -> BTreeSet<&str> {
        self.side(direction)
            .get(word)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Words seen immediately after `word`.
    pub fn neighbors_after(&self, word: &str) -> BTreeSet<&str> {
        self.neighbors(word, Direction::After)
    }

    /// Words seen immediately before `word`.
    pub fn neighbors_before(&self, word: &str) -> BTreeSet<&str> {
        self.neighbors(word, Direction::Before)
    }

    /// Union of the neighbor sets of `words`.
    pub fn union<I, S>(&self, words: I, direction: Direction) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = BTreeSet::new();
        for word in words {
            out.extend(
                self.neighbors(word.as_ref(), direction)
                    .into_iter()
                    .map(str::to_string),
            );
        }
        out
    }

    /// Intersection of the neighbor sets of `words`; empty for no words.
    pub fn intersection<I, S>(&self, words: I, direction: Direction) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words.into_iter();
        let Some(first) = words.next() else {
            return BTreeSet::new();
        };
        let mut out: BTreeSet<String> = self
            .neighbors(first.as_ref(), direction)
            .into_iter()
            .map(str::to_string)
            .collect();
        for word in words {
            if out.is_empty() {
                break;
            }
            let next = self.neighbors(word.as_ref(), direction);
            out.retain(|w| next.contains(w.as_str()));
        }
        out
    }

    /// Union of words following any of `words`.
    pub fn union_after<I, S>(&self, words: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.union(words, Direction::After)
    }

    /// Union of words preceding any of `words`.
    pub fn union_before<I, S>(&self, words: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.union(words, Direction::Before)
    }

    /// Words following every one of `words`.
    pub fn intersect_after<I, S>(&self, words: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.intersection(words, Direction::After)
    }

    /// Words preceding every one of `words`.
    pub fn intersect_before<I, S>(&self, words: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.intersection(words, Direction::Before)
    }

    /// Every bigram seen more than `n` times, most frequent first.
    pub fn pairs_above(&self, n: u32) -> Vec<(&str, &str, u32)> {
        let mut pairs: Vec<(&str, &str, u32)> = self
            .after
            .iter()
            .flat_map(|(first, next)| {
                next.iter()
                    .filter(move |(_, &count)| count > n)
                    .map(move |(second, &count)| (first.as_str(), second.as_str(), count))
            })
            .collect();
        pairs.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| (a.0, a.1).cmp(&(b.0, b.1))));
        pairs
    }

    /// Number of distinct bigrams.
    pub fn len(&self) -> usize {
        self.after.values().map(HashMap::len).sum()
    }

    /// True if no bigram was recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of recorded bigram occurrences.
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> BigramIndex {
        let mut index = BigramIndex::new();
        index.add_sequence(&["the", "cat", "saw", "the", "dog"]);
        index.add_sequence(&["a", "cat", "saw", "a", "dog"]);
        index
    }

    #[test]
    fn test_counts_and_defaults() {
        let index = sample();
        assert_eq!(index.count("cat", "saw"), 2);
        assert_eq!(index.count("the", "cat"), 1);
        assert_eq!(index.count("cat", "the"), 0);
        assert!(index.exists("saw", "a"));
        assert!(!index.exists("dog", "saw"));
        assert!(!index.exists("unknown", "cat"));
        assert_eq!(index.total(), 8);
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn test_neighbor_sets() {
        let index = sample();
        let after_the: Vec<&str> = index.neighbors_after("the").into_iter().collect();
        assert_eq!(after_the, vec!["cat", "dog"]);
        let before_cat: Vec<&str> = index.neighbors_before("cat").into_iter().collect();
        assert_eq!(before_cat, vec!["a", "the"]);
        assert!(index.neighbors_after("dog").is_empty());
    }

    #[test]
    fn test_combinators() {
        let index = sample();
        let union = index.union_before(["cat", "the"]);
        assert_eq!(union.into_iter().collect::<Vec<_>>(), vec!["a", "saw", "the"]);

        let inter = index.intersect_before(["cat", "dog"]);
        assert_eq!(inter.into_iter().collect::<Vec<_>>(), vec!["a", "the"]);

        let after = index.intersect_after(["the", "a"]);
        assert_eq!(after.into_iter().collect::<Vec<_>>(), vec!["cat", "dog"]);

        assert!(index.intersect_after(Vec::<String>::new()).is_empty());
        assert!(index.union_after(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_pairs_above() {
        let index = sample();
        assert_eq!(index.pairs_above(1), vec![("cat", "saw", 2)]);
        assert_eq!(index.pairs_above(0).len(), 7);
    }

    proptest! {
        #[test]
        fn prop_forward_backward_agree(tokens in proptest::collection::vec("[a-e]", 0..80)) {
            let mut index = BigramIndex::new();
            index.add_sequence(&tokens);
            for pair in tokens.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(index.count(a, b) >= 1);
                prop_assert_eq!(index.count(a, b), index.count_backward(a, b));
            }
            let occurrences: u64 = index.pairs_above(0).iter().map(|p| p.2 as u64).sum();
            prop_assert_eq!(occurrences, index.total());
        }
    }
}
