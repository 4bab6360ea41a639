//! Community detection over word similarity graphs.
//!
//! Words that share many contexts end up densely connected in a
//! [`CommonNeighborsGraph`](crate::graph::CommonNeighborsGraph); communities
//! of that graph are candidate syntactic categories.
//!
//! ## The Modularity Objective
//!
//! Louvain maximizes **modularity** Q, comparing the weight inside each
//! community to what a random graph with the same degrees would give:
//!
//! ```text
//! Q = Σ_c [ in_c/m − (tot_c/m)² ]
//! ```
//!
//! Where:
//! - m = sum of all weighted degrees (each edge counted from both ends)
//! - in_c = weight of edges inside c, counted from both ends, plus self-loops
//! - tot_c = sum of the weighted degrees of c's members
//!
//! A good partition has Q > 0. Modularity is reported for diagnostics; it
//! does not steer when the algorithm stops.
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use syncat::community::{CommunityDetection, Louvain};
//!
//! let adjacency = array![
//!     [0.0, 1.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0, 0.0],
//!     [0.0, 0.0, 0.0, 1.0],
//!     [0.0, 0.0, 1.0, 0.0],
//! ];
//! let labels = Louvain::new().detect(&adjacency).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//! ```
//!
//! ## References
//!
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

mod dendrogram;
mod louvain;
mod traits;

pub use dendrogram::{Community, Dendrogram};
pub use louvain::Louvain;
pub use traits::CommunityDetection;
