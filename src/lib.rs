//! # syncat
//!
//! Syntactic category induction: morphological seeds + distributional graph clustering over raw text.
//!
//! A trie over the corpus vocabulary yields stem/suffix paradigms; the most
//! regular one picks a seed word set. Words sharing bigram neighbors with the
//! seed are linked in a common-neighbors graph and grouped by Louvain
//! community detection. Maximal bicliques of the bigram graph give an
//! independent grouping to compare against.
//!
//! ```rust
//! use syncat::{Corpus, Learner, LearnerConfig};
//!
//! let corpus = Corpus::parse(
//!     "he walked home. she walked home. he talked home. she talked home.
//!      they walk. they talk. we are walking. we are talking.",
//! )
//! .unwrap();
//! let learner = Learner::train(&corpus, LearnerConfig::default()).unwrap();
//! let induction = learner.search().unwrap();
//! assert!(!induction.right.clusters.is_empty());
//! ```

pub mod biclique;
pub mod bigram;
pub mod community;
/// Error types used across `syncat`.
pub mod error;
pub mod graph;
pub mod metrics;
pub mod morphology;
pub mod pipeline;


pub use biclique::{Biclique, BicliqueFinder, BicliqueSearch, NeighborMode};
pub use bigram::{BigramIndex, Direction};
pub use community::{CommunityDetection, Dendrogram, Louvain};
pub use error::{Error, Result};
pub use graph::{CommonNeighborsConfig, CommonNeighborsGraph, Edge, NeighborWeighting, Side};
pub use metrics::{ari, compare_clusterings, nmi, purity, Agreement};
pub use morphology::{MorphologicalMatrix, Morphology, Seed, Trie};
pub use pipeline::{CategoryInduction, Corpus, Learner, LearnerConfig, SideClustering};
