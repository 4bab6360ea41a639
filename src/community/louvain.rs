//! Louvain community detection over a dense similarity matrix.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! 1. **Local moving**: every node starts in its own community. Nodes are
//!    visited in index order and moved to the neighboring community with the
//!    highest modularity gain. Sweeps repeat until no node moves.
//!
//! 2. **Coarsening**: communities become the nodes of a new graph. Weights
//!    between two communities are summed over their members; internal weight
//!    lands on the diagonal as a self-loop.
//!
//! 3. **Iterate** until a pass leaves the node count unchanged.
//!
//! Each pass is recorded in a [`Dendrogram`].
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! Journal of Statistical Mechanics: Theory and Experiment, P10008.

use super::dendrogram::{Community, Dendrogram};
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};

/// Louvain community detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Louvain {
    /// Maximum number of local-moving plus coarsening passes.
    max_passes: usize,
    /// Maximum number of sweeps over the nodes within one pass.
    max_sweeps: usize,
}

impl Louvain {
    /// Create a detector with default limits.
    pub fn new() -> Self {
        Self {
            max_passes: 32,
            max_sweeps: 1000,
        }
    }

    /// Set the maximum number of passes.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Set the maximum number of sweeps per pass.
    ///
    /// Sweeps normally stop on their own once no node moves.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Maximum number of passes.
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Maximum number of sweeps per pass.
    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }

    /// Run Louvain on a symmetric non-negative adjacency matrix.
    ///
    /// # Panics
    ///
    /// Panics if `adjacency` is not square.
    pub fn run(&self, adjacency: &Array2<f64>) -> Dendrogram {
        assert_eq!(
            adjacency.nrows(),
            adjacency.ncols(),
            "adjacency matrix must be square"
        );
        let n = adjacency.nrows();
        let mut dendrogram = Dendrogram::new(n);
        if n == 0 {
            return dendrogram;
        }

        let mut coarse: Option<Array2<f64>> = None;
        for pass in 0..self.max_passes {
            let graph = coarse.as_ref().unwrap_or(adjacency);
            let n_nodes = graph.nrows();

            let mut level = Level::new(graph.view());
            let sweeps = level.optimize(self.max_sweeps);
            let modularity = level.modularity();
            let communities = level.into_communities();

            tracing::debug!(
                pass,
                nodes = n_nodes,
                communities = communities.len(),
                sweeps,
                modularity,
                "louvain pass"
            );

            let next = (communities.len() < n_nodes).then(|| coarsen(graph, &communities));
            dendrogram.push_level(communities, modularity);
            match next {
                Some(g) => coarse = Some(g),
                None => break,
            }
        }
        dendrogram
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Louvain {
    fn detect(&self, adjacency: &Array2<f64>) -> Result<Vec<usize>> {
        if adjacency.nrows() != adjacency.ncols() {
            return Err(Error::DimensionMismatch {
                expected: adjacency.nrows(),
                found: adjacency.ncols(),
            });
        }
        Ok(self.run(adjacency).labels())
    }
}

/// Working state of one pass.
struct Level<'g> {
    graph: ArrayView2<'g, f64>,
    node_to_community: Vec<usize>,
    degrees: Vec<f64>,
    /// Other nodes joined by a positive weight, in index order.
    neighbors: Vec<Vec<usize>>,
    communities: Vec<Community>,
    /// Sum of all weighted degrees.
    m: f64,
}

impl<'g> Level<'g> {
    fn new(graph: ArrayView2<'g, f64>) -> Self {
        let n = graph.nrows();
        let degrees = graph.sum_axis(Axis(1)).to_vec();
        let neighbors = graph
            .outer_iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(j, &w)| j != i && w > 0.0)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        let communities = (0..n)
            .map(|i| Community::singleton(i, graph[(i, i)], degrees[i]))
            .collect();
        let m = degrees.iter().sum();

        Self {
            graph,
            node_to_community: (0..n).collect(),
            degrees,
            neighbors,
            communities,
            m,
        }
    }

    /// Sweep until no node moves. Returns the number of sweeps run.
    fn optimize(&mut self, max_sweeps: usize) -> usize {
        let mut sweeps = 0;
        while sweeps < max_sweeps {
            sweeps += 1;
            let mut improved = false;
            for node in 0..self.graph.nrows() {
                improved |= self.move_node(node);
            }
            if !improved {
                break;
            }
        }
        sweeps
    }

    /// Move `node` to its best community. Returns true if it changed.
    fn move_node(&mut self, node: usize) -> bool {
        if self.neighbors[node].is_empty() {
            return false;
        }

        // Own community first, then neighbor communities as encountered.
        let old = self.node_to_community[node];
        let mut candidates: Vec<(usize, f64)> = vec![(old, 0.0)];
        for &j in &self.neighbors[node] {
            let c = self.node_to_community[j];
            let w = self.graph[(node, j)];
            match candidates.iter_mut().find(|(id, _)| *id == c) {
                Some(entry) => entry.1 += w,
                None => candidates.push((c, w)),
            }
        }

        let degree = self.degrees[node];
        let self_loop = self.graph[(node, node)];
        self.communities[old].remove_node(node, candidates[0].1, self_loop, degree);

        let mut best = candidates[0];
        let mut best_gain = self.communities[old].gain(best.1, degree, self.m);
        for &(c, w) in &candidates[1..] {
            let gain = self.communities[c].gain(w, degree, self.m);
            if gain > best_gain {
                best_gain = gain;
                best = (c, w);
            }
        }

        self.communities[best.0].insert_node(node, best.1, self_loop, degree);
        self.node_to_community[node] = best.0;
        best.0 != old
    }

    fn modularity(&self) -> f64 {
        if self.m == 0.0 {
            return 0.0;
        }
        self.communities.iter().map(|c| c.modularity(self.m)).sum()
    }

    /// Non-empty communities, members ascending.
    fn into_communities(self) -> Vec<Community> {
        self.communities
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(|mut c| {
                c.members.sort_unstable();
                c
            })
            .collect()
    }
}

/// Collapse each community into one node.
fn coarsen(graph: &Array2<f64>, communities: &[Community]) -> Array2<f64> {
    let mut community_of = vec![0; graph.nrows()];
    for (c, community) in communities.iter().enumerate() {
        for &node in &community.members {
            community_of[node] = c;
        }
    }

    let k = communities.len();
    let mut coarse = Array2::<f64>::zeros((k, k));
    for ((i, j), &w) in graph.indexed_iter() {
        if w != 0.0 {
            coarse[(community_of[i], community_of[j])] += w;
        }
    }
    coarse
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn two_triangles() -> Array2<f64> {
        let mut a = Array2::<f64>::zeros((6, 6));
        for &(i, j) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)] {
            a[(i, j)] = 1.0;
            a[(j, i)] = 1.0;
        }
        a
    }

    #[test]
    fn test_two_disjoint_pairs() {
        let a = array![
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let d = Louvain::new().run(&a);
        assert_eq!(d.clusters(), vec![vec![0, 1], vec![2, 3]]);
        assert!((d.modularity() - 0.5).abs() < 1e-12);
        // The second pass finds nothing left to merge.
        assert_eq!(d.n_levels(), 2);
        assert!((d.modularity_history()[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_two_triangles() {
        let labels = Louvain::new().detect(&two_triangles()).unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_triangle_single_community() {
        let a = array![[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
        let d = Louvain::new().run(&a);
        assert_eq!(d.clusters(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_edgeless_and_empty() {
        let d = Louvain::new().run(&Array2::zeros((3, 3)));
        assert_eq!(d.clusters(), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(d.modularity(), 0.0);

        let d = Louvain::new().run(&Array2::zeros((0, 0)));
        assert_eq!(d.n_levels(), 0);
        assert!(d.clusters().is_empty());
    }

    #[test]
    fn test_detect_rejects_non_square() {
        let err = Louvain::new().detect(&Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_coarsen_keeps_total_weight() {
        let a = two_triangles();
        let communities = vec![
            Community::singleton(0, 0.0, 0.0),
            Community {
                members: vec![1, 2, 3, 4, 5],
                internal_weight: 0.0,
                total_weight: 0.0,
            },
        ];
        let coarse = coarsen(&a, &communities);
        assert_eq!(coarse.sum(), a.sum());
        assert_eq!(coarse[(0, 1)], 2.0);
        assert_eq!(coarse[(0, 0)], 0.0);
    }

    fn symmetric_matrix() -> impl Strategy<Value = Array2<f64>> {
        (1usize..12).prop_flat_map(|n| {
            proptest::collection::vec(prop_oneof![Just(0.0), 0.5f64..3.0], n * n).prop_map(
                move |values| {
                    let mut a = Array2::<f64>::zeros((n, n));
                    for i in 0..n {
                        for j in (i + 1)..n {
                            a[(i, j)] = values[i * n + j];
                            a[(j, i)] = values[i * n + j];
                        }
                    }
                    a
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_clusters_partition_nodes(a in symmetric_matrix()) {
            let d = Louvain::new().run(&a);
            let mut seen = vec![false; a.nrows()];
            for cluster in d.clusters() {
                prop_assert!(!cluster.is_empty());
                for node in cluster {
                    prop_assert!(!seen[node]);
                    seen[node] = true;
                }
            }
            prop_assert!(seen.iter().all(|&s| s));

            for level in 0..d.n_levels() {
                let total: usize = d.clusters_at(level).unwrap().iter().map(Vec::len).sum();
                prop_assert_eq!(total, a.nrows());
            }
        }
    }
}
