//! Community detection traits.

use crate::error::Result;
use ndarray::Array2;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a weighted adjacency matrix.
    ///
    /// Returns a mapping from node index to community ID.
    fn detect(&self, adjacency: &Array2<f64>) -> Result<Vec<usize>>;

    /// Detect communities in a weighted petgraph graph.
    fn detect_graph<N>(&self, graph: &UnGraph<N, f64>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        let mut adjacency = Array2::<f64>::zeros((n, n));
        for edge in graph.edge_references() {
            let (i, j) = (edge.source().index(), edge.target().index());
            adjacency[(i, j)] += *edge.weight();
            if i != j {
                adjacency[(j, i)] += *edge.weight();
            }
        }
        self.detect(&adjacency)
    }
}
