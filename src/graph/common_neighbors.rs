//! Common-neighbors similarity graphs from a bipartite bigram graph.
//!
//! Left words and right words form the two blocks of a bipartite adjacency
//! matrix `A`:
//!
//! ```text
//!          left   right
//!   A = [   0      B   ]      B[i][j] = w(count(left_i, right_j))
//!       [   Bᵀ     0   ]
//! ```
//!
//! Squaring gives `A² = diag(B·Bᵀ, Bᵀ·B)`: entry (i, j) of each diagonal block
//! aggregates the neighbors words i and j share on the other side. With
//! [`NeighborWeighting::SqrtCount`] each product `√c_ik · √c_jk` is the
//! geometric mean of the two bigram counts.

use super::{Edge, Side};
use crate::bigram::BigramIndex;
use crate::error::{Error, Result};
use ndarray::{s, Array2};
use std::collections::HashSet;

#[cfg(feature = "parallel")]
use ndarray::Array1;

/// How a bigram count becomes a bipartite edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborWeighting {
    /// `w = √count`; shared-neighbor weight is a sum of geometric means.
    #[default]
    SqrtCount,
    /// `w = 1` for any seen bigram; shared-neighbor weight is a plain count.
    Binary,
}

impl NeighborWeighting {
    fn weight(self, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }
        match self {
            NeighborWeighting::SqrtCount => f64::from(count).sqrt(),
            NeighborWeighting::Binary => 1.0,
        }
    }
}

/// Configuration for [`CommonNeighborsGraph::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommonNeighborsConfig {
    /// Entries below this weight are dropped (default: 1.0).
    pub min_common_neighbors: f64,
    /// Bipartite edge weighting (default: square root of the count).
    pub weighting: NeighborWeighting,
}

impl Default for CommonNeighborsConfig {
    fn default() -> Self {
        Self {
            min_common_neighbors: 1.0,
            weighting: NeighborWeighting::SqrtCount,
        }
    }
}

impl CommonNeighborsConfig {
    /// Set the minimum shared-neighbor weight.
    pub fn with_min_common_neighbors(mut self, min: f64) -> Self {
        self.min_common_neighbors = min;
        self
    }

    /// Set the bipartite edge weighting.
    pub fn with_weighting(mut self, weighting: NeighborWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.min_common_neighbors.is_finite() || self.min_common_neighbors < 0.0 {
            return Err(Error::InvalidParameter {
                name: "min_common_neighbors",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Left-side and right-side similarity graphs over two word lists.
#[derive(Debug, Clone)]
pub struct CommonNeighborsGraph {
    left_words: Vec<String>,
    right_words: Vec<String>,
    left: Array2<f64>,
    right: Array2<f64>,
    config: CommonNeighborsConfig,
}

impl CommonNeighborsGraph {
    /// Build both similarity graphs.
    ///
    /// Repeated words within a list are kept once, at their first position.
    pub fn build<L, R>(
        bigrams: &BigramIndex,
        left_words: &[L],
        right_words: &[R],
        config: &CommonNeighborsConfig,
    ) -> Result<Self>
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        config.validate()?;

        let left_words = dedup(left_words);
        let right_words = dedup(right_words);
        let n_left = left_words.len();

        let adjacency = adjacency_matrix(bigrams, &left_words, &right_words, config.weighting);
        let mut neighbors = square(&adjacency);

        let n = neighbors.nrows();
        for i in 0..n {
            neighbors[(i, i)] = 0.0;
            // Matrix products may differ in the last bit between (i, j) and (j, i).
            for j in (i + 1)..n {
                let w = neighbors[(i, j)];
                neighbors[(j, i)] = w;
            }
        }
        let min = config.min_common_neighbors;
        neighbors.mapv_inplace(|w| if w < min { 0.0 } else { w });

        let left = neighbors.slice(s![..n_left, ..n_left]).to_owned();
        let right = neighbors.slice(s![n_left.., n_left..]).to_owned();

        tracing::debug!(
            left = n_left,
            right = right_words.len(),
            left_edges = count_edges(&left),
            right_edges = count_edges(&right),
            min_common_neighbors = min,
            "built common-neighbors graphs"
        );

        Ok(Self {
            left_words,
            right_words,
            left,
            right,
            config: config.clone(),
        })
    }

    /// Words indexing the given side.
    pub fn words(&self, side: Side) -> &[String] {
        match side {
            Side::Left => &self.left_words,
            Side::Right => &self.right_words,
        }
    }

    /// Similarity matrix of the given side.
    pub fn matrix(&self, side: Side) -> &Array2<f64> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Configuration the graph was built with.
    pub fn config(&self) -> &CommonNeighborsConfig {
        &self.config
    }

    /// Edge list `(word1, word2, weight)` of the given side, one entry per
    /// unordered pair with positive weight.
    pub fn edges(&self, side: Side) -> Vec<Edge> {
        let words = self.words(side);
        let matrix = self.matrix(side);
        let mut edges = Vec::new();
        for i in 0..words.len() {
            for j in (i + 1)..words.len() {
                let weight = matrix[(i, j)];
                if weight > 0.0 {
                    edges.push(Edge {
                        source: words[i].clone(),
                        target: words[j].clone(),
                        weight,
                    });
                }
            }
        }
        edges
    }
}

/// Bipartite adjacency over `left ++ right`.
pub fn adjacency_matrix<S: AsRef<str>>(
    bigrams: &BigramIndex,
    left_words: &[S],
    right_words: &[S],
    weighting: NeighborWeighting,
) -> Array2<f64> {
    let n_left = left_words.len();
    let n = n_left + right_words.len();
    let mut adjacency = Array2::<f64>::zeros((n, n));
    for (i, first) in left_words.iter().enumerate() {
        for (j, second) in right_words.iter().enumerate() {
            let w = weighting.weight(bigrams.count(first.as_ref(), second.as_ref()));
            if w > 0.0 {
                adjacency[(i, n_left + j)] = w;
                adjacency[(n_left + j, i)] = w;
            }
        }
    }
    adjacency
}

#[cfg(not(feature = "parallel"))]
fn square(adjacency: &Array2<f64>) -> Array2<f64> {
    adjacency.dot(adjacency)
}

#[cfg(feature = "parallel")]
fn square(adjacency: &Array2<f64>) -> Array2<f64> {
    use rayon::prelude::*;

    let n = adjacency.nrows();
    let rows: Vec<Array1<f64>> = (0..n)
        .into_par_iter()
        .map(|i| adjacency.row(i).dot(adjacency))
        .collect();
    let mut out = Array2::<f64>::zeros((n, n));
    for (i, row) in rows.iter().enumerate() {
        out.row_mut(i).assign(row);
    }
    out
}

fn dedup<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .map(AsRef::as_ref)
        .filter(|w| seen.insert(*w))
        .map(str::to_string)
        .collect()
}

fn count_edges(matrix: &Array2<f64>) -> usize {
    matrix.iter().filter(|&&w| w > 0.0).count() / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn toy() -> BigramIndex {
        let mut index = BigramIndex::new();
        for (a, b) in [
            ("the", "cat"),
            ("the", "dog"),
            ("a", "cat"),
            ("a", "dog"),
            ("he", "walked"),
            ("she", "walked"),
            ("he", "talked"),
            ("she", "talked"),
        ] {
            index.add(a, b);
        }
        index
    }

    #[test]
    fn test_adjacency_is_bipartite_sqrt() {
        let mut index = BigramIndex::new();
        for _ in 0..4 {
            index.add("the", "cat");
        }
        let adj = adjacency_matrix(&index, &["the"], &["cat"], NeighborWeighting::SqrtCount);
        assert_eq!(adj.dim(), (2, 2));
        assert_eq!(adj[(0, 1)], 2.0);
        assert_eq!(adj[(1, 0)], 2.0);
        assert_eq!(adj[(0, 0)], 0.0);
    }

    #[test]
    fn test_shared_neighbors() {
        let index = toy();
        let left = ["the", "a", "he", "she"];
        let right = ["cat", "dog", "walked", "talked"];
        let graph =
            CommonNeighborsGraph::build(&index, &left, &right, &CommonNeighborsConfig::default())
                .unwrap();

        let r = graph.matrix(Side::Right);
        assert_eq!(r[(0, 1)], 2.0); // cat-dog share {the, a}
        assert_eq!(r[(2, 3)], 2.0); // walked-talked share {he, she}
        assert_eq!(r[(0, 2)], 0.0);

        let l = graph.matrix(Side::Left);
        assert_eq!(l[(0, 1)], 2.0);
        assert_eq!(l[(2, 3)], 2.0);
        assert_eq!(l[(1, 2)], 0.0);

        let edges = graph.edges(Side::Right);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, "cat");
        assert_eq!(edges[0].target, "dog");
    }

    #[test]
    fn test_threshold_drops_weak_pairs() {
        let index = toy();
        let config = CommonNeighborsConfig::default().with_min_common_neighbors(3.0);
        let graph = CommonNeighborsGraph::build(
            &index,
            &["the", "a", "he", "she"],
            &["cat", "dog", "walked", "talked"],
            &config,
        )
        .unwrap();
        assert!(graph.edges(Side::Left).is_empty());
        assert!(graph.edges(Side::Right).is_empty());
    }

    #[test]
    fn test_binary_weighting_counts_neighbors() {
        let mut index = toy();
        for _ in 0..8 {
            index.add("the", "cat");
        }
        let sqrt = CommonNeighborsGraph::build(
            &index,
            &["the", "a"],
            &["cat", "dog"],
            &CommonNeighborsConfig::default(),
        )
        .unwrap();
        let binary = CommonNeighborsGraph::build(
            &index,
            &["the", "a"],
            &["cat", "dog"],
            &CommonNeighborsConfig::default().with_weighting(NeighborWeighting::Binary),
        )
        .unwrap();
        // cat-dog through "the": sqrt(9) * sqrt(1) = 3, through "a": 1.
        assert!((sqrt.matrix(Side::Right)[(0, 1)] - 4.0).abs() < 1e-12);
        assert_eq!(binary.matrix(Side::Right)[(0, 1)], 2.0);
    }

    #[test]
    fn test_empty_lists() {
        let index = toy();
        let graph = CommonNeighborsGraph::build::<&str, &str>(
            &index,
            &[],
            &[],
            &CommonNeighborsConfig::default(),
        )
        .unwrap();
        assert_eq!(graph.matrix(Side::Left).dim(), (0, 0));
        assert!(graph.edges(Side::Right).is_empty());
    }

    #[test]
    fn test_duplicates_and_bad_config() {
        let index = toy();
        let graph = CommonNeighborsGraph::build(
            &index,
            &["the", "the", "a"],
            &["cat"],
            &CommonNeighborsConfig::default(),
        )
        .unwrap();
        assert_eq!(graph.words(Side::Left), ["the", "a"]);

        let bad = CommonNeighborsConfig::default().with_min_common_neighbors(f64::NAN);
        assert!(CommonNeighborsGraph::build(&index, &["the"], &["cat"], &bad).is_err());
    }

    proptest! {
        #[test]
        fn prop_symmetric_zero_diagonal(
            pairs in proptest::collection::vec(("[a-f]", "[a-f]"), 0..60),
            min in 0.0f64..3.0,
        ) {
            let mut index = BigramIndex::new();
            for (a, b) in &pairs {
                index.add(a, b);
            }
            let left: Vec<String> = pairs.iter().map(|p| p.0.clone()).collect();
            let right: Vec<String> = pairs.iter().map(|p| p.1.clone()).collect();
            let config = CommonNeighborsConfig::default().with_min_common_neighbors(min);
            let graph =
                CommonNeighborsGraph::build(&index, left.as_slice(), right.as_slice(), &config)
                    .unwrap();

            for side in [Side::Left, Side::Right] {
                let m = graph.matrix(side);
                prop_assert_eq!(m.nrows(), m.ncols());
                for i in 0..m.nrows() {
                    prop_assert_eq!(m[(i, i)], 0.0);
                    for j in 0..m.ncols() {
                        prop_assert_eq!(m[(i, j)], m[(j, i)]);
                        prop_assert!(m[(i, j)] >= 0.0);
                        prop_assert!(m[(i, j)] == 0.0 || m[(i, j)] >= min);
                    }
                }
            }
        }
    }
}
