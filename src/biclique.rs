//! Maximal biclique enumeration over the bigram graph.
//!
//! A biclique `(L, R)` is a set of left words and a set of right words where
//! every `l r` bigram was seen. It is maximal when no word can be added to
//! either side without breaking that.
//!
//! The search is a bipartite branch-and-bound in the style of maximal clique
//! enumeration. `R` is the biclique being grown, `P` the right words that
//! may still extend it and `Q` the right words already explored, which serve
//! only to reject non-maximal branches:
//!
//! ```text
//! for candidate in P:
//!     LL = { l ∈ L : l → candidate }
//!     if some q ∈ Q follows all of LL: skip (already covered)
//!     RR = R + candidate + { v ∈ P : all of LL → v }
//!     PP = { v ∈ P : some but not all of LL → v }
//!     emit (LL, RR); recurse on (LL, RR, PP, QQ)
//!     Q += candidate
//! ```

use crate::bigram::{BigramIndex, Direction};
use crate::graph::{Edge, Side};
use std::collections::BTreeSet;

/// How the opposite side of the input words is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborMode {
    /// Words adjacent to any input word.
    #[default]
    Union,
    /// Words adjacent to every input word.
    Intersection,
}

/// A complete bipartite subgraph of the bigram graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Biclique {
    /// First words of the bigrams.
    pub left: BTreeSet<String>,
    /// Second words of the bigrams.
    pub right: BTreeSet<String>,
}

impl Biclique {
    /// Number of bigram types covered.
    pub fn edge_count(&self) -> usize {
        self.left.len() * self.right.len()
    }

    /// Every covered bigram, weighted by its count.
    pub fn edges(&self, bigrams: &BigramIndex) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for l in &self.left {
            for r in &self.right {
                edges.push(Edge {
                    source: l.clone(),
                    target: r.clone(),
                    weight: f64::from(bigrams.count(l, r)),
                });
            }
        }
        edges
    }
}

/// Result of a biclique search.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BicliqueSearch {
    bicliques: Vec<Biclique>,
    best: Option<usize>,
}

impl BicliqueSearch {
    /// Biclique with the most right words; the first found wins ties.
    pub fn best(&self) -> Option<&Biclique> {
        self.best.and_then(|i| self.bicliques.get(i))
    }

    /// Maximal bicliques in discovery order.
    pub fn bicliques(&self) -> &[Biclique] {
        &self.bicliques
    }

    /// Take ownership of the bicliques, in discovery order.
    pub fn into_bicliques(self) -> Vec<Biclique> {
        self.bicliques
    }

    /// Number of bicliques found.
    pub fn len(&self) -> usize {
        self.bicliques.len()
    }

    /// True if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.bicliques.is_empty()
    }

    fn emit(&mut self, left: BTreeSet<String>, right: BTreeSet<String>) {
        tracing::trace!(left = ?left, right = ?right, "maximal biclique");
        let larger = match self.best() {
            Some(best) => right.len() > best.right.len(),
            None => true,
        };
        if larger {
            self.best = Some(self.bicliques.len());
        }
        self.bicliques.push(Biclique { left, right });
    }
}

/// Enumerates maximal bicliques around a word set.
#[derive(Debug, Clone, Copy)]
pub struct BicliqueFinder<'a> {
    bigrams: &'a BigramIndex,
    mode: NeighborMode,
}

impl<'a> BicliqueFinder<'a> {
    /// Finder over `bigrams`, deriving neighbors by union.
    pub fn new(bigrams: &'a BigramIndex) -> Self {
        Self {
            bigrams,
            mode: NeighborMode::Union,
        }
    }

    /// Set how the opposite side is derived.
    pub fn with_mode(mut self, mode: NeighborMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enumerate maximal bicliques containing only `words` on `side` and
    /// their bigram neighbors on the other side.
    pub fn find<I, S>(&self, words: I, side: Side) -> BicliqueSearch
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect();

        let (left, candidates) = match side {
            Side::Right => {
                let left = self.opposite(&words, Direction::Before);
                (left, words)
            }
            Side::Left => {
                let right = self.opposite(&words, Direction::After);
                (words, right)
            }
        };

        let mut search = BicliqueSearch::default();
        self.search(
            &left,
            &BTreeSet::new(),
            candidates,
            BTreeSet::new(),
            &mut search,
        );
        tracing::debug!(
            left = left.len(),
            found = search.len(),
            best_right = search.best().map_or(0, |b| b.right.len()),
            "biclique search finished"
        );
        search
    }

    fn opposite(&self, words: &BTreeSet<String>, direction: Direction) -> BTreeSet<String> {
        match self.mode {
            NeighborMode::Union => self.bigrams.union(words, direction),
            NeighborMode::Intersection => self.bigrams.intersection(words, direction),
        }
    }

    /// Number of words in `left` preceding `word`.
    fn adjacent_count(&self, left: &BTreeSet<String>, word: &str) -> usize {
        left.iter()
            .filter(|l| self.bigrams.exists(l, word))
            .count()
    }

    fn search(
        &self,
        left: &BTreeSet<String>,
        right: &BTreeSet<String>,
        mut candidates: BTreeSet<String>,
        mut explored: BTreeSet<String>,
        out: &mut BicliqueSearch,
    ) {
        while let Some(candidate) = candidates.pop_first() {
            let ll: BTreeSet<String> = left
                .iter()
                .filter(|l| self.bigrams.exists(l, &candidate))
                .cloned()
                .collect();

            if !ll.is_empty() {
                self.branch(&ll, right, &candidate, &candidates, &explored, out);
            }
            explored.insert(candidate);
        }
    }

    fn branch(
        &self,
        ll: &BTreeSet<String>,
        right: &BTreeSet<String>,
        candidate: &str,
        candidates: &BTreeSet<String>,
        explored: &BTreeSet<String>,
        out: &mut BicliqueSearch,
    ) {
        let mut qq = BTreeSet::new();
        for v in explored {
            let k = self.adjacent_count(ll, v);
            if k == ll.len() {
                return;
            }
            if k > 0 {
                qq.insert(v.clone());
            }
        }

        let mut rr = right.clone();
        rr.insert(candidate.to_string());
        let mut pp = BTreeSet::new();
        for v in candidates {
            let k = self.adjacent_count(ll, v);
            if k == ll.len() {
                rr.insert(v.clone());
            } else if k > 0 {
                pp.insert(v.clone());
            }
        }

        out.emit(ll.clone(), rr.clone());
        if !pp.is_empty() {
            self.search(ll, &rr, pp, qq, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn complete(left: &[&str], right: &[&str]) -> BigramIndex {
        let mut index = BigramIndex::new();
        for l in left {
            for r in right {
                index.add(l, r);
            }
        }
        index
    }

    #[test]
    fn test_complete_bipartite_single_biclique() {
        let index = complete(&["a", "the", "this"], &["cat", "dog"]);
        let search = BicliqueFinder::new(&index).find(["cat", "dog"], Side::Right);
        assert_eq!(search.len(), 1);
        let b = &search.bicliques()[0];
        assert_eq!(b.left, set(&["a", "the", "this"]));
        assert_eq!(b.right, set(&["cat", "dog"]));
        assert_eq!(search.best(), Some(b));
        assert_eq!(b.edge_count(), 6);
    }

    #[test]
    fn test_complete_bipartite_from_left() {
        let index = complete(&["a", "the"], &["cat", "dog", "bird"]);
        let search = BicliqueFinder::new(&index).find(["a", "the"], Side::Left);
        assert_eq!(search.len(), 1);
        assert_eq!(search.bicliques()[0].left, set(&["a", "the"]));
        assert_eq!(search.bicliques()[0].right, set(&["bird", "cat", "dog"]));
    }

    #[test]
    fn test_overlapping_bicliques() {
        // a → x, a → y, b → y
        let mut index = BigramIndex::new();
        index.add("a", "x");
        index.add("a", "y");
        index.add("b", "y");

        let search = BicliqueFinder::new(&index).find(["x", "y"], Side::Right);
        assert_eq!(
            search.bicliques(),
            &[
                Biclique {
                    left: set(&["a"]),
                    right: set(&["x", "y"]),
                },
                Biclique {
                    left: set(&["a", "b"]),
                    right: set(&["y"]),
                },
            ]
        );
        assert_eq!(search.best().map(|b| b.right.len()), Some(2));
    }

    #[test]
    fn test_best_points_into_bicliques() {
        let mut index = BigramIndex::new();
        index.add("a", "x");
        index.add("a", "y");
        index.add("b", "y");

        let search = BicliqueFinder::new(&index).find(["x", "y"], Side::Right);
        let best = search.best().cloned();
        assert_eq!(best.as_ref(), search.bicliques().first());
        assert_eq!(best.as_ref().map(|b| b.left.clone()), Some(set(&["a"])));

        let owned = search.into_bicliques();
        assert_eq!(owned.len(), 2);
        assert_eq!(best.as_ref(), owned.first());

        let single = BicliqueFinder::new(&index).find(["x"], Side::Right);
        assert_eq!(single.best(), single.bicliques().first());
        assert_eq!(single.into_bicliques().len(), 1);
    }

    #[test]
    fn test_intersection_mode_narrows_left() {
        let mut index = BigramIndex::new();
        index.add("a", "x");
        index.add("a", "y");
        index.add("b", "y");

        let search = BicliqueFinder::new(&index)
            .with_mode(NeighborMode::Intersection)
            .find(["x", "y"], Side::Right);
        assert_eq!(search.len(), 1);
        assert_eq!(search.bicliques()[0].left, set(&["a"]));
        assert_eq!(search.bicliques()[0].right, set(&["x", "y"]));
    }

    #[test]
    fn test_no_neighbors() {
        let index = complete(&["a"], &["x"]);
        let search = BicliqueFinder::new(&index).find(["unknown"], Side::Right);
        assert!(search.is_empty());
        assert!(search.best().is_none());
    }

    #[test]
    fn test_edges_carry_counts() {
        let mut index = complete(&["the"], &["cat"]);
        index.add("the", "cat");
        let b = Biclique {
            left: set(&["the"]),
            right: set(&["cat"]),
        };
        let edges = b.edges(&index);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].weight, 2.0);
    }
}
