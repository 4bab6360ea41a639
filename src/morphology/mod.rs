//! Morphological induction: stems, suffixes and paradigm buckets.
//!
//! ## Pipeline
//!
//! ```text
//! Trie ──BFS──▶ (father, son, difference) ──▶ StemVector / SuffixVector
//!                                                    │ prune rare suffixes
//!                                                    ▼
//!                                           MorphologicalMatrix ──▶ Seed
//! ```
//!
//! Every terminal node reached from another terminal node (other than the
//! root) yields a stem (`father`), a derived form (`son`) and a suffix
//! candidate (the characters between them). Suffixes whose share of all
//! occurrences is below a threshold are discarded before the matrix is
//! built; the default threshold is [`DEFAULT_MIN_SUFFIX_FREQUENCY`].

mod matrix;
mod trie;
mod vectors;

pub use matrix::{BucketLabel, Form, MorphologicalBucket, MorphologicalMatrix, Seed};
pub use trie::{SuffixExpansion, Trie, TrieNode};
pub use vectors::{StemVector, SuffixVector};

use crate::error::{Error, Result};
use std::collections::{BTreeSet, VecDeque};

/// Default relative-frequency cutoff for suffix candidates.
pub const DEFAULT_MIN_SUFFIX_FREQUENCY: f64 = 0.005;

/// Stem and suffix tables induced from a trie.
#[derive(Debug, Clone, Default)]
pub struct Morphology {
    stems: StemVector,
    suffixes: SuffixVector,
}

impl Morphology {
    /// Collect every stem/suffix decomposition in `trie` with a
    /// breadth-first traversal from the root.
    pub fn from_trie(trie: &Trie) -> Self {
        let mut stems = StemVector::new();
        let mut suffixes = SuffixVector::new();

        let root = trie.root();
        let mut queue: VecDeque<&TrieNode> = VecDeque::new();
        queue.push_back(root);

        while let Some(node) = queue.pop_front() {
            for expansion in node.expand_suffixes() {
                queue.push_back(expansion.son);

                // Every word is trivially a suffix of the empty root.
                if std::ptr::eq(expansion.father, root) {
                    continue;
                }

                let (Some(stem), Some(word)) = (expansion.father.value(), expansion.son.value())
                else {
                    continue;
                };
                suffixes.add(&expansion.difference, stem);
                stems.add(stem, &expansion.difference);
                stems.add_derived_form(stem, word, &expansion.difference);
            }
        }

        tracing::debug!(
            stems = stems.len(),
            suffixes = suffixes.len(),
            occurrences = suffixes.total(),
            "collected suffix candidates"
        );

        Self { stems, suffixes }
    }

    /// Discard suffixes whose relative frequency is below `min_frequency`,
    /// then drop the stem records that used them.
    ///
    /// Returns the discarded suffixes.
    pub fn prune(&mut self, min_frequency: f64) -> Result<Vec<String>> {
        if !(0.0..=1.0).contains(&min_frequency) {
            return Err(Error::InvalidParameter {
                name: "min_frequency",
                message: "must be within [0, 1]",
            });
        }

        let discarded = self.suffixes.prune_below(min_frequency);
        let keep: BTreeSet<&str> = self.suffixes.suffixes().collect();
        self.stems.retain_suffixes(&keep);

        tracing::debug!(
            kept = self.suffixes.len(),
            discarded = discarded.len(),
            stems = self.stems.len(),
            min_frequency,
            "pruned rare suffixes"
        );
        Ok(discarded)
    }

    /// Stem table.
    pub fn stems(&self) -> &StemVector {
        &self.stems
    }

    /// Suffix table.
    pub fn suffixes(&self) -> &SuffixVector {
        &self.suffixes
    }

    /// Build the occurrence matrix and its buckets.
    pub fn matrix(&self) -> MorphologicalMatrix {
        MorphologicalMatrix::new(&self.stems, &self.suffixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_trie_skips_root() {
        let trie: Trie = ["walk", "walked", "walking"].into_iter().collect();
        let morphology = Morphology::from_trie(&trie);

        assert_eq!(morphology.stems().len(), 1);
        assert_eq!(morphology.stems().suffixes_of("walk"), ["ed", "ing"]);
        assert_eq!(
            morphology.stems().derived_forms("walk"),
            [
                ("walked".to_string(), "ed".to_string()),
                ("walking".to_string(), "ing".to_string())
            ]
        );
        assert_eq!(morphology.suffixes().total(), 2);
        assert!(!morphology.suffixes().contains("walk"));
    }

    #[test]
    fn test_chained_stems() {
        // "walked" is both a derived form of "walk" and a stem of "walkeds".
        let trie: Trie = ["walk", "walked", "walkeds"].into_iter().collect();
        let morphology = Morphology::from_trie(&trie);
        assert_eq!(morphology.stems().suffixes_of("walk"), ["ed"]);
        assert_eq!(morphology.stems().suffixes_of("walked"), ["s"]);
    }

    #[test]
    fn test_prune_rejects_bad_threshold() {
        let mut morphology = Morphology::default();
        assert!(morphology.prune(1.5).is_err());
        assert!(morphology.prune(-0.1).is_err());
    }

    #[test]
    fn test_walk_bucket_carries_bare_stem() {
        let trie: Trie = ["walk", "walked", "walking"].into_iter().collect();
        let mut morphology = Morphology::from_trie(&trie);
        morphology.prune(DEFAULT_MIN_SUFFIX_FREQUENCY).unwrap();
        let matrix = morphology.matrix();
        assert_eq!(matrix.buckets().len(), 1);
        let words: Vec<&str> = matrix.buckets()[0].words().collect();
        assert_eq!(words, vec!["walk", "walked", "walking"]);
        assert_eq!(matrix.buckets()[0].form_of("walk"), Some(Form::Stem));
    }

    fn vocabulary() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-d]{1,6}", 1..60)
    }

    proptest! {
        #[test]
        fn prop_pruning_respects_threshold(words in vocabulary(), threshold in 0.0f64..0.5) {
            let trie: Trie = words.iter().collect();
            let mut morphology = Morphology::from_trie(&trie);
            let before = morphology.suffixes().clone();
            let discarded = morphology.prune(threshold).unwrap();

            for suffix in morphology.suffixes().suffixes() {
                prop_assert!(before.frequency(suffix) >= threshold);
            }
            for suffix in &discarded {
                prop_assert!(before.frequency(suffix) < threshold);
            }
            prop_assert_eq!(morphology.suffixes().len() + discarded.len(), before.len());
            for stem in morphology.stems().stems() {
                for suffix in morphology.stems().suffixes_of(stem) {
                    prop_assert!(morphology.suffixes().contains(suffix));
                }
            }
        }

        #[test]
        fn prop_buckets_partition_stems(words in vocabulary(), threshold in 0.0f64..0.2) {
            let trie: Trie = words.iter().collect();
            let mut morphology = Morphology::from_trie(&trie);
            morphology.prune(threshold).unwrap();
            let matrix = morphology.matrix();

            let mut seen = BTreeSet::new();
            for bucket in matrix.buckets() {
                prop_assert!(!bucket.stems().is_empty());
                for stem in bucket.stems() {
                    prop_assert!(seen.insert(stem.clone()), "stem {} in two buckets", stem);
                }
            }
            let all: BTreeSet<String> = morphology.stems().stems().map(str::to_string).collect();
            prop_assert_eq!(seen, all);
        }
    }
}
