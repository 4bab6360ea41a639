//! Agreement between word clusterings.
//!
//! Induced categories have no gold standard, but two independent groupings
//! of the same words can be checked against each other, e.g. Louvain
//! communities against maximal bicliques.
//!
//! # Metrics Overview
//!
//! | Metric | Range | Best | Properties |
//! |--------|-------|------|------------|
//! | [`nmi`] | [0, 1] | 1 | Normalized mutual information |
//! | [`ari`] | [-1, 1] | 1 | Adjusted for chance |
//! | [`purity`] | [0, 1] | 1 | Simple, biased toward many clusters |
//!
//! # Example
//!
//! ```rust
//! use syncat::metrics::{ari, nmi, purity};
//!
//! let pred = [0, 0, 1, 1, 2, 2];
//! let truth = [0, 0, 0, 1, 1, 1];
//!
//! let nmi_score = nmi(&pred, &truth);
//! let ari_score = ari(&pred, &truth);
//! let purity_score = purity(&pred, &truth);
//! assert!(nmi_score < 1.0 && ari_score < 1.0 && purity_score < 1.0);
//! ```
//!
//! # References
//!
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Normalized Mutual Information between two label assignments.
///
/// ```text
/// NMI(U, V) = 2 * I(U; V) / (H(U) + H(V))
/// ```
///
/// Returns 0 for empty or mismatched inputs and 1 when both are constant.
///
/// ```rust
/// use syncat::metrics::nmi;
///
/// assert!((nmi(&[0, 0, 1, 1], &[1, 1, 0, 0]) - 1.0).abs() < 1e-12);
/// assert!(nmi(&[0, 1, 0, 1], &[0, 0, 1, 1]) < 0.5);
/// ```
pub fn nmi(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let n = pred.len() as f64;
    let joint = contingency_table(pred, truth);
    let p_pred = counts(pred);
    let p_truth = counts(truth);

    let mut mi = 0.0;
    for (&(p, t), &count) in &joint {
        let p_joint = count as f64 / n;
        let p_p = p_pred[&p] as f64 / n;
        let p_t = p_truth[&t] as f64 / n;
        mi += p_joint * (p_joint / (p_p * p_t)).ln();
    }

    let denom = entropy(&p_pred, n) + entropy(&p_truth, n);
    if denom > 0.0 {
        2.0 * mi / denom
    } else {
        1.0
    }
}

/// Adjusted Rand Index between two label assignments.
///
/// 0 is chance level, 1 is perfect agreement.
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let joint = contingency_table(pred, truth);
    let sum_comb_ij: f64 = joint.values().map(|&c| comb2(c) as f64).sum();
    let sum_comb_a: f64 = counts(pred).values().map(|&a| comb2(a) as f64).sum();
    let sum_comb_b: f64 = counts(truth).values().map(|&b| comb2(b) as f64).sum();

    let comb_n = comb2(pred.len()) as f64;
    if comb_n == 0.0 {
        return 1.0;
    }

    let expected = sum_comb_a * sum_comb_b / comb_n;
    let max_index = (sum_comb_a + sum_comb_b) / 2.0;
    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        return 1.0;
    }
    (sum_comb_ij - expected) / denom
}

/// Fraction of items whose cluster's majority class matches their own.
///
/// Purity is 1.0 when every item is its own cluster. Use with caution.
pub fn purity(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let mut cluster_maxes: HashMap<usize, usize> = HashMap::new();
    for (&(p, _), &count) in &contingency_table(pred, truth) {
        let best = cluster_maxes.entry(p).or_insert(0);
        *best = (*best).max(count);
    }
    cluster_maxes.values().sum::<usize>() as f64 / pred.len() as f64
}

/// Label vectors over the words present in both clusterings.
///
/// A word found in several clusters of one side takes the first. Words are
/// returned in lexicographic order, aligned with both label vectors.
pub fn shared_labels(
    pred: &[BTreeSet<String>],
    truth: &[BTreeSet<String>],
) -> (Vec<String>, Vec<usize>, Vec<usize>) {
    let pred_of = first_cluster(pred);
    let truth_of = first_cluster(truth);

    let mut words = Vec::new();
    let mut p = Vec::new();
    let mut t = Vec::new();
    for (word, &label) in &pred_of {
        if let Some(&other) = truth_of.get(word) {
            words.push(word.to_string());
            p.push(label);
            t.push(other);
        }
    }
    (words, p, t)
}

/// Agreement scores between two word clusterings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agreement {
    /// Words present in both clusterings.
    pub shared_words: usize,
    pub nmi: f64,
    pub ari: f64,
    pub purity: f64,
}

/// Score `pred` against `truth` on the words they share.
pub fn compare_clusterings(pred: &[BTreeSet<String>], truth: &[BTreeSet<String>]) -> Agreement {
    let (words, p, t) = shared_labels(pred, truth);
    Agreement {
        shared_words: words.len(),
        nmi: nmi(&p, &t),
        ari: ari(&p, &t),
        purity: purity(&p, &t),
    }
}

fn first_cluster(clusters: &[BTreeSet<String>]) -> BTreeMap<&str, usize> {
    let mut of = BTreeMap::new();
    for (id, cluster) in clusters.iter().enumerate() {
        for word in cluster {
            of.entry(word.as_str()).or_insert(id);
        }
    }
    of
}

fn contingency_table(pred: &[usize], truth: &[usize]) -> HashMap<(usize, usize), usize> {
    let mut table = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth.iter()) {
        *table.entry((p, t)).or_insert(0) += 1;
    }
    table
}

fn counts(labels: &[usize]) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    for &l in labels {
        *counts.entry(l).or_insert(0) += 1;
    }
    counts
}

fn entropy(counts: &HashMap<usize, usize>, n: f64) -> f64 {
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}

fn comb2(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}
