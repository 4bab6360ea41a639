//! End-to-end category induction.
//!
//! ```text
//! Corpus ──▶ Trie ──▶ Morphology ──▶ MorphologicalMatrix ──▶ Seed (right words)
//!    │                                                          │
//!    └──▶ BigramIndex ──▶ union of preceding words (left words) ◀┘
//!                              │
//!                              ▼
//!                     CommonNeighborsGraph ──▶ Louvain (per side) ──▶ clusters
//! ```
//!
//! Bigrams see sentences padded with boundary markers; the trie sees only
//! the corpus tokens.

use crate::biclique::{BicliqueFinder, BicliqueSearch, NeighborMode};
use crate::bigram::BigramIndex;
use crate::community::{Dendrogram, Louvain};
use crate::error::{Error, Result};
use crate::graph::{CommonNeighborsConfig, CommonNeighborsGraph, NeighborWeighting, Side};
use crate::morphology::{
    Morphology, MorphologicalMatrix, Seed, Trie, DEFAULT_MIN_SUFFIX_FREQUENCY,
};
use std::collections::{BTreeSet, HashMap};

/// Marker prepended to every sentence for bigram counting.
pub const BEGIN_OF_SENTENCE: &str = "#beginS#";
/// Marker appended to every sentence for bigram counting.
pub const END_OF_SENTENCE: &str = "#endS#";

/// Characters that end a sentence when splitting raw text.
const SENTENCE_DELIMITERS: &[char] = &[
    '\r', '\n', '(', ')', '?', ',', '*', '.', ';', '!', '\\', '/', ':', '"', '—',
];

/// Validated sentences of word tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corpus {
    sentences: Vec<Vec<String>>,
}

impl Corpus {
    /// Wrap tokenized sentences.
    ///
    /// Fails with [`Error::EmptyCorpus`] when there is no token at all and
    /// with [`Error::MalformedCorpus`] on an empty token or one containing
    /// whitespace. Empty sentences are dropped.
    pub fn new<S, T>(sentences: S) -> Result<Self>
    where
        S: IntoIterator<Item = T>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let mut out = Vec::new();
        for (index, sentence) in sentences.into_iter().enumerate() {
            let tokens: Vec<String> = sentence.into_iter().map(Into::into).collect();
            if let Some(bad) = tokens
                .iter()
                .find(|t| t.is_empty() || t.chars().any(char::is_whitespace))
            {
                return Err(Error::MalformedCorpus {
                    sentence: index,
                    token: bad.clone(),
                });
            }
            if !tokens.is_empty() {
                out.push(tokens);
            }
        }
        if out.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(Self { sentences: out })
    }

    /// Split raw text into lowercase sentences.
    ///
    /// Sentences end at punctuation and line breaks; fragments of a single
    /// character are discarded.
    pub fn parse(text: &str) -> Result<Self> {
        let sentences = text
            .split(SENTENCE_DELIMITERS)
            .map(|s| s.trim().to_lowercase())
            .filter(|s| s.chars().count() > 1)
            .map(|s| {
                s.split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<String>>()
            });
        Self::new(sentences)
    }

    /// Sentences in corpus order.
    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    /// Total number of tokens.
    pub fn n_tokens(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }
}

/// Learner configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnerConfig {
    /// Relative-frequency cutoff for suffix candidates.
    pub min_suffix_frequency: f64,
    /// Minimum shared-neighbor weight kept in the similarity graphs.
    pub min_common_neighbors: f64,
    /// Bigram count weighting in the similarity graphs.
    pub weighting: NeighborWeighting,
    /// Pad every sentence with boundary markers before counting bigrams.
    pub pad_sentences: bool,
    pub begin_marker: String,
    pub end_marker: String,
    /// Community detection used on both sides.
    pub louvain: Louvain,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            min_suffix_frequency: DEFAULT_MIN_SUFFIX_FREQUENCY,
            min_common_neighbors: 1.0,
            weighting: NeighborWeighting::SqrtCount,
            pad_sentences: true,
            begin_marker: BEGIN_OF_SENTENCE.to_string(),
            end_marker: END_OF_SENTENCE.to_string(),
            louvain: Louvain::new(),
        }
    }
}

impl LearnerConfig {
    /// Set the suffix frequency cutoff.
    pub fn with_min_suffix_frequency(mut self, min: f64) -> Self {
        self.min_suffix_frequency = min;
        self
    }

    /// Set the minimum shared-neighbor weight.
    pub fn with_min_common_neighbors(mut self, min: f64) -> Self {
        self.min_common_neighbors = min;
        self
    }

    /// Set the similarity graph weighting.
    pub fn with_weighting(mut self, weighting: NeighborWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Enable or disable sentence boundary markers.
    pub fn with_pad_sentences(mut self, pad: bool) -> Self {
        self.pad_sentences = pad;
        self
    }

    /// Set the boundary markers.
    pub fn with_markers(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.begin_marker = begin.into();
        self.end_marker = end.into();
        self
    }

    /// Set the community detection parameters.
    pub fn with_louvain(mut self, louvain: Louvain) -> Self {
        self.louvain = louvain;
        self
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_suffix_frequency) {
            return Err(Error::InvalidParameter {
                name: "min_suffix_frequency",
                message: "must be within [0, 1]",
            });
        }
        if !self.min_common_neighbors.is_finite() || self.min_common_neighbors < 0.0 {
            return Err(Error::InvalidParameter {
                name: "min_common_neighbors",
                message: "must be finite and non-negative",
            });
        }
        if self.pad_sentences && (self.begin_marker.is_empty() || self.end_marker.is_empty()) {
            return Err(Error::InvalidParameter {
                name: "markers",
                message: "must not be empty when padding sentences",
            });
        }
        if self.louvain.max_passes() == 0 || self.louvain.max_sweeps() == 0 {
            return Err(Error::InvalidParameter {
                name: "louvain",
                message: "pass and sweep limits must be positive",
            });
        }
        Ok(())
    }

    fn graph_config(&self) -> CommonNeighborsConfig {
        CommonNeighborsConfig::default()
            .with_min_common_neighbors(self.min_common_neighbors)
            .with_weighting(self.weighting)
    }
}

/// Communities of one side of the similarity graph.
#[derive(Debug, Clone)]
pub struct SideClustering {
    /// Full Louvain record.
    pub dendrogram: Dendrogram,
    /// Words of each final community.
    pub clusters: Vec<BTreeSet<String>>,
}

impl SideClustering {
    fn detect(graph: &CommonNeighborsGraph, side: Side, louvain: &Louvain) -> Self {
        let dendrogram = louvain.run(graph.matrix(side));
        let clusters = graph.clusters_to_words(side, &dendrogram.clusters());
        Self {
            dendrogram,
            clusters,
        }
    }

    /// Clusters with more than one word.
    pub fn nontrivial(&self) -> impl Iterator<Item = &BTreeSet<String>> {
        self.clusters.iter().filter(|c| c.len() > 1)
    }
}

/// Output of one induction run.
#[derive(Debug, Clone)]
pub struct CategoryInduction {
    /// Morphological seed, when the right words came from one.
    pub seed: Option<Seed>,
    pub graph: CommonNeighborsGraph,
    pub left: SideClustering,
    pub right: SideClustering,
}

/// Trained corpus statistics.
#[derive(Debug, Clone)]
pub struct Learner {
    config: LearnerConfig,
    trie: Trie,
    bigrams: BigramIndex,
    morphology: Morphology,
    matrix: MorphologicalMatrix,
    bucket_of_word: HashMap<String, usize>,
}

impl Learner {
    /// Build the bigram index, trie and morphological matrix from `corpus`.
    pub fn train(corpus: &Corpus, config: LearnerConfig) -> Result<Self> {
        config.validate()?;

        let mut trie = Trie::new();
        let mut bigrams = BigramIndex::new();
        for sentence in corpus.sentences() {
            if config.pad_sentences {
                let mut padded: Vec<&str> = Vec::with_capacity(sentence.len() + 2);
                padded.push(&config.begin_marker);
                padded.extend(sentence.iter().map(String::as_str));
                padded.push(&config.end_marker);
                bigrams.add_sequence(&padded);
            } else {
                bigrams.add_sequence(sentence.as_slice());
            }
            trie.extend(sentence.iter().map(String::as_str));
        }

        let mut morphology = Morphology::from_trie(&trie);
        morphology.prune(config.min_suffix_frequency)?;
        let matrix = morphology.matrix();

        let mut bucket_of_word = HashMap::new();
        for (b, bucket) in matrix.buckets().iter().enumerate() {
            for word in bucket.words() {
                bucket_of_word.insert(word.to_string(), b);
            }
        }

        tracing::info!(
            sentences = corpus.sentences().len(),
            tokens = corpus.n_tokens(),
            bigrams = bigrams.len(),
            stems = morphology.stems().len(),
            suffixes = morphology.suffixes().len(),
            buckets = matrix.buckets().len(),
            "trained learner"
        );

        Ok(Self {
            config,
            trie,
            bigrams,
            morphology,
            matrix,
            bucket_of_word,
        })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn bigrams(&self) -> &BigramIndex {
        &self.bigrams
    }

    pub fn morphology(&self) -> &Morphology {
        &self.morphology
    }

    pub fn matrix(&self) -> &MorphologicalMatrix {
        &self.matrix
    }

    /// Morphological bucket holding `word`, if any.
    ///
    /// Words whose suffixes were all pruned belong to no bucket.
    pub fn bucket_of(&self, word: &str) -> Option<usize> {
        self.bucket_of_word.get(word).copied()
    }

    /// Seed word set from the morphological matrix.
    pub fn seed(&self) -> Result<Seed> {
        self.matrix.find_seed()
    }

    /// Cluster the seed words and the words preceding them.
    pub fn search(&self) -> Result<CategoryInduction> {
        let seed = self.seed()?;
        let left: Vec<String> = self.bigrams.union_before(&seed.words).into_iter().collect();
        let mut induction = self.induce(left.as_slice(), seed.words.as_slice())?;
        induction.seed = Some(seed);
        Ok(induction)
    }

    /// Cluster arbitrary left and right word lists.
    pub fn induce<L, R>(&self, left: &[L], right: &[R]) -> Result<CategoryInduction>
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        let graph =
            CommonNeighborsGraph::build(&self.bigrams, left, right, &self.config.graph_config())?;
        let left = SideClustering::detect(&graph, Side::Left, &self.config.louvain);
        let right = SideClustering::detect(&graph, Side::Right, &self.config.louvain);

        tracing::info!(
            left_words = graph.words(Side::Left).len(),
            right_words = graph.words(Side::Right).len(),
            left_clusters = left.nontrivial().count(),
            right_clusters = right.nontrivial().count(),
            left_modularity = left.dendrogram.modularity(),
            right_modularity = right.dendrogram.modularity(),
            "induced categories"
        );

        Ok(CategoryInduction {
            seed: None,
            graph,
            left,
            right,
        })
    }

    /// Maximal bicliques around `words` on `side`.
    pub fn bicliques<I, S>(&self, words: I, side: Side, mode: NeighborMode) -> BicliqueSearch
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        BicliqueFinder::new(&self.bigrams)
            .with_mode(mode)
            .find(words, side)
    }
}
