//! Word similarity graphs.
//!
//! A [`CommonNeighborsGraph`] connects two words of the same side when they
//! share neighbors on the other side of the bigram graph. Its matrices feed
//! community detection directly; [`CommonNeighborsGraph::to_petgraph`] and
//! [`CommonNeighborsGraph::components`] give a graph view of the same data.

mod common_neighbors;

pub use common_neighbors::{
    adjacency_matrix, CommonNeighborsConfig, CommonNeighborsGraph, NeighborWeighting,
};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::BTreeSet;

/// One side of a bipartite word graph.
///
/// Left words precede right words in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

/// Weighted edge between two words.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl CommonNeighborsGraph {
    /// Export one side as a petgraph undirected graph.
    ///
    /// Node `i` carries word `i` of that side, so node indices line up with
    /// the matrix rows.
    pub fn to_petgraph(&self, side: Side) -> UnGraph<String, f64> {
        let words = self.words(side);
        let matrix = self.matrix(side);
        let mut g = UnGraph::with_capacity(words.len(), 0);
        for word in words {
            g.add_node(word.clone());
        }
        for i in 0..words.len() {
            for j in (i + 1)..words.len() {
                let w = matrix[(i, j)];
                if w > 0.0 {
                    g.add_edge(NodeIndex::new(i), NodeIndex::new(j), w);
                }
            }
        }
        g
    }

    /// Connected groups of words on one side.
    ///
    /// Words with no edge are left out. Groups are ordered by their smallest
    /// word.
    pub fn components(&self, side: Side) -> Vec<BTreeSet<String>> {
        let g = self.to_petgraph(side);
        let mut groups: Vec<BTreeSet<String>> = kosaraju_scc(&g)
            .into_iter()
            .filter(|nodes| nodes.len() > 1)
            .map(|nodes| nodes.into_iter().map(|n| g[n].clone()).collect())
            .collect();
        groups.sort();
        groups
    }

    /// Map clusters of row indices back to the words of one side.
    pub fn clusters_to_words(&self, side: Side, clusters: &[Vec<usize>]) -> Vec<BTreeSet<String>> {
        let words = self.words(side);
        clusters
            .iter()
            .map(|members| {
                members
                    .iter()
                    .filter_map(|&i| words.get(i).cloned())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigram::BigramIndex;

    fn graph() -> CommonNeighborsGraph {
        let mut index = BigramIndex::new();
        for sentence in [
            ["the", "cat"],
            ["the", "dog"],
            ["a", "cat"],
            ["a", "dog"],
            ["he", "walked"],
            ["she", "walked"],
        ] {
            index.add_sequence(&sentence);
        }
        CommonNeighborsGraph::build(
            &index,
            &["the", "a", "he", "she"],
            &["cat", "dog", "walked", "bird"],
            &CommonNeighborsConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_petgraph_export() {
        let g = graph().to_petgraph(Side::Left);
        assert_eq!(g.node_count(), 4);
        // the-a share two neighbors, he-she share one.
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g[NodeIndex::new(2)], "he");
    }

    #[test]
    fn test_components() {
        let graph = graph();
        let left = graph.components(Side::Left);
        let expected: Vec<BTreeSet<String>> = vec![
            ["a", "the"].iter().map(|s| s.to_string()).collect(),
            ["he", "she"].iter().map(|s| s.to_string()).collect(),
        ];
        assert_eq!(left, expected);

        // "walked" and "bird" have no partner on the right side.
        let right = graph.components(Side::Right);
        assert_eq!(right.len(), 1);
        assert!(right[0].contains("cat") && right[0].contains("dog"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_edges_serialize() {
        let edges = graph().edges(Side::Right);
        let json = serde_json::to_string(&edges).unwrap();
        assert_eq!(json, r#"[{"source":"cat","target":"dog","weight":2.0}]"#);
        let back: Vec<Edge> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, edges);
    }

    #[test]
    fn test_clusters_to_words() {
        let graph = graph();
        let words = graph.clusters_to_words(Side::Right, &[vec![0, 1], vec![2]]);
        assert_eq!(words.len(), 2);
        assert!(words[0].contains("cat"));
        assert!(words[1].contains("walked"));
    }
}
