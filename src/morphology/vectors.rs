//! Stem and suffix occurrence tables.

use std::collections::{BTreeMap, BTreeSet};

/// Stem → attested suffixes, and stem → derived word forms.
#[derive(Debug, Clone, Default)]
pub struct StemVector {
    suffixes: BTreeMap<String, Vec<String>>,
    derived: BTreeMap<String, Vec<(String, String)>>,
}

impl StemVector {
    /// Create an empty stem vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `suffix` attaches to `stem`.
    pub fn add(&mut self, stem: &str, suffix: &str) {
        self.suffixes
            .entry(stem.to_string())
            .or_default()
            .push(suffix.to_string());
    }

    /// Record that `word` is `stem` + `suffix`.
    pub fn add_derived_form(&mut self, stem: &str, word: &str, suffix: &str) {
        self.derived
            .entry(stem.to_string())
            .or_default()
            .push((word.to_string(), suffix.to_string()));
    }

    /// Number of stems.
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    /// True if no stem was recorded.
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// All stems, in lexicographic order.
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.suffixes.keys().map(String::as_str)
    }

    /// Suffixes attested for `stem`, in discovery order.
    pub fn suffixes_of(&self, stem: &str) -> &[String] {
        self.suffixes.get(stem).map_or(&[], Vec::as_slice)
    }

    /// `(word, suffix)` pairs derived from `stem`, in discovery order.
    pub fn derived_forms(&self, stem: &str) -> &[(String, String)] {
        self.derived.get(stem).map_or(&[], Vec::as_slice)
    }

    /// Drop every record whose suffix is not in `keep`.
    ///
    /// Stems left without any suffix are removed entirely.
    pub fn retain_suffixes(&mut self, keep: &BTreeSet<&str>) {
        for suffixes in self.suffixes.values_mut() {
            suffixes.retain(|s| keep.contains(s.as_str()));
        }
        for forms in self.derived.values_mut() {
            forms.retain(|(_, s)| keep.contains(s.as_str()));
        }
        self.suffixes.retain(|_, suffixes| !suffixes.is_empty());
        self.derived.retain(|_, forms| !forms.is_empty());
    }
}

/// Suffix → stems it attaches to, with a running occurrence total.
#[derive(Debug, Clone, Default)]
pub struct SuffixVector {
    stems: BTreeMap<String, Vec<String>>,
    total: usize,
}

impl SuffixVector {
    /// Create an empty suffix vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `suffix` on `stem`.
    pub fn add(&mut self, suffix: &str, stem: &str) {
        self.stems
            .entry(suffix.to_string())
            .or_default()
            .push(stem.to_string());
        self.total += 1;
    }

    /// Occurrences recorded before any pruning.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct suffixes.
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    /// True if no suffix is held.
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// All suffixes, in lexicographic order.
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.stems.keys().map(String::as_str)
    }

    /// Whether `suffix` is held.
    pub fn contains(&self, suffix: &str) -> bool {
        self.stems.contains_key(suffix)
    }

    /// Stems carrying `suffix`.
    pub fn stems_of(&self, suffix: &str) -> &[String] {
        self.stems.get(suffix).map_or(&[], Vec::as_slice)
    }

    /// Occurrences of `suffix`.
    pub fn count(&self, suffix: &str) -> usize {
        self.stems_of(suffix).len()
    }

    /// Relative frequency of `suffix` against [`SuffixVector::total`].
    pub fn frequency(&self, suffix: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(suffix) as f64 / self.total as f64
    }

    /// Suffixes occurring at least `threshold` times.
    pub fn above_count(&self, threshold: usize) -> Vec<(&str, usize)> {
        self.stems
            .iter()
            .filter(|(_, stems)| stems.len() >= threshold)
            .map(|(s, stems)| (s.as_str(), stems.len()))
            .collect()
    }

    /// Discard suffixes whose relative frequency is below `threshold`.
    ///
    /// The total is left untouched so frequencies stay comparable before and
    /// after pruning. Returns the discarded suffixes.
    pub fn prune_below(&mut self, threshold: f64) -> Vec<String> {
        let total = self.total;
        let below = |count: usize| total == 0 || (count as f64 / total as f64) < threshold;

        let discarded: Vec<String> = self
            .stems
            .iter()
            .filter(|(_, stems)| below(stems.len()))
            .map(|(s, _)| s.clone())
            .collect();
        self.stems.retain(|_, stems| !below(stems.len()));
        discarded
    }

    /// Suffix/appearance table, most frequent first.
    pub fn statistics(&self) -> Vec<(&str, usize)> {
        let mut table: Vec<(&str, usize)> = self
            .stems
            .iter()
            .map(|(s, stems)| (s.as_str(), stems.len()))
            .collect();
        table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        table
    }
}
