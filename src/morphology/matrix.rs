//! Suffix × stem occurrence matrix and morphological buckets.
//!
//! Each column of the matrix is the suffix signature of one stem. Stems with
//! identical columns share a paradigm and are grouped into one
//! [`MorphologicalBucket`]:
//!
//! ```text
//!            walk  talk  cat  dog
//!   "ed"       1     1    0    0      bucket 0: {walk, talk}  -> ed,ing
//!   "ing"      1     1    0    0      bucket 1: {cat, dog}    -> s
//!   "s"        0     0    1    1
//! ```

use super::vectors::{StemVector, SuffixVector};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use std::collections::{BTreeMap, HashMap};

/// How a word realizes its bucket's paradigm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Form {
    /// The bare stem.
    Stem,
    /// Stem plus the suffix with this matrix row index.
    Suffixed(usize),
}

/// Stems sharing one suffix signature, with the words realizing it.
#[derive(Debug, Clone, Default)]
pub struct MorphologicalBucket {
    suffixes: Vec<usize>,
    stems: Vec<String>,
    words: BTreeMap<String, Form>,
    words_of_suffix: BTreeMap<usize, Vec<String>>,
}

impl MorphologicalBucket {
    /// Row indices of the suffixes in this bucket's signature.
    pub fn suffixes(&self) -> &[usize] {
        &self.suffixes
    }

    /// Stems in this bucket.
    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    /// Every word in the bucket, ordered.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Words carrying the suffix with row index `suffix`.
    pub fn words_of_suffix(&self, suffix: usize) -> &[String] {
        self.words_of_suffix.get(&suffix).map_or(&[], Vec::as_slice)
    }

    /// How `word` realizes this bucket, if it belongs to it.
    pub fn form_of(&self, word: &str) -> Option<Form> {
        self.words.get(word).copied()
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the bucket holds no word.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add `word`; a word already present keeps its first form.
    fn add_word(&mut self, word: &str, form: Form) {
        if self.words.contains_key(word) {
            return;
        }
        self.words.insert(word.to_string(), form);
        if let Form::Suffixed(suffix) = form {
            self.words_of_suffix
                .entry(suffix)
                .or_default()
                .push(word.to_string());
        }
    }
}

/// Seed word set chosen by [`MorphologicalMatrix::find_seed`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed {
    /// Index of the winning bucket.
    pub bucket: usize,
    /// Winning suffix.
    pub suffix: String,
    /// Score of the winning cell.
    pub score: f64,
    /// Words of the suffix within the bucket.
    pub words: Vec<String>,
}

/// Paradigm label of a bucket and its stems.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketLabel {
    /// Comma-joined suffixes of the signature.
    pub label: String,
    /// Stems sharing it.
    pub stems: Vec<String>,
}

/// Boolean suffix × stem matrix with its column buckets.
#[derive(Debug, Clone)]
pub struct MorphologicalMatrix {
    stems: Vec<String>,
    suffixes: Vec<String>,
    suffix_index: HashMap<String, usize>,
    occurrence: Array2<u8>,
    buckets: Vec<MorphologicalBucket>,
    bucket_of_stem: Vec<usize>,
}

impl MorphologicalMatrix {
    /// Build the occurrence matrix and deduplicate its columns.
    ///
    /// Suffixes absent from `suffixes` are ignored.
    pub fn new(stems: &StemVector, suffixes: &SuffixVector) -> Self {
        let stem_names: Vec<String> = stems.stems().map(str::to_string).collect();
        let suffix_names: Vec<String> = suffixes.suffixes().map(str::to_string).collect();
        let suffix_index: HashMap<String, usize> = suffix_names
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let mut occurrence = Array2::<u8>::zeros((suffix_names.len(), stem_names.len()));
        for (col, stem) in stem_names.iter().enumerate() {
            for suffix in stems.suffixes_of(stem) {
                if let Some(&row) = suffix_index.get(suffix) {
                    occurrence[(row, col)] = 1;
                }
            }
        }

        let mut buckets: Vec<MorphologicalBucket> = Vec::new();
        let mut bucket_of_stem = Vec::with_capacity(stem_names.len());
        let mut signatures: HashMap<Vec<u8>, usize> = HashMap::new();

        for (col, stem) in stem_names.iter().enumerate() {
            let column = occurrence.column(col).to_vec();
            let b = *signatures.entry(column).or_insert_with_key(|signature| {
                buckets.push(MorphologicalBucket {
                    suffixes: signature
                        .iter()
                        .enumerate()
                        .filter(|(_, &bit)| bit == 1)
                        .map(|(row, _)| row)
                        .collect(),
                    ..Default::default()
                });
                buckets.len() - 1
            });
            bucket_of_stem.push(b);

            let bucket = &mut buckets[b];
            bucket.stems.push(stem.clone());
            bucket.add_word(stem, Form::Stem);
            for (word, suffix) in stems.derived_forms(stem) {
                if let Some(&row) = suffix_index.get(suffix) {
                    bucket.add_word(word, Form::Suffixed(row));
                }
            }
        }

        Self {
            stems: stem_names,
            suffixes: suffix_names,
            suffix_index,
            occurrence,
            buckets,
            bucket_of_stem,
        }
    }

    /// The occurrence matrix (rows = suffixes, columns = stems).
    pub fn occurrence(&self) -> &Array2<u8> {
        &self.occurrence
    }

    /// Stems, in column order.
    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    /// Suffixes, in row order.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Row index of `suffix`.
    pub fn suffix_index(&self, suffix: &str) -> Option<usize> {
        self.suffix_index.get(suffix).copied()
    }

    /// Buckets, in order of first appearance.
    pub fn buckets(&self) -> &[MorphologicalBucket] {
        &self.buckets
    }

    /// Bucket index of the stem in column `column`.
    pub fn bucket_of_stem(&self, column: usize) -> usize {
        self.bucket_of_stem[column]
    }

    /// Paradigm label of bucket `b`.
    pub fn label(&self, b: usize) -> String {
        self.buckets[b]
            .suffixes
            .iter()
            .map(|&row| self.suffixes[row].as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Label and stems of every bucket.
    pub fn labels(&self) -> Vec<BucketLabel> {
        (0..self.buckets.len())
            .map(|b| BucketLabel {
                label: self.label(b),
                stems: self.buckets[b].stems.clone(),
            })
            .collect()
    }

    /// Pick the seed word set for distributional clustering.
    ///
    /// Scores every (suffix, bucket) cell as
    /// `frequency[bucket] * column[suffix] + ambiguity[suffix]`, where
    /// frequency is bucket size over the largest bucket size and ambiguity is
    /// the inverse number of buckets attesting the suffix, scaled so the least
    /// ambiguous suffix scores 1. Ties go to the first cell in bucket-major
    /// order.
    pub fn find_seed(&self) -> Result<Seed> {
        if self.buckets.is_empty() || self.suffixes.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n_suffixes = self.suffixes.len();
        let n_buckets = self.buckets.len();

        let mut basis = Array2::<f64>::zeros((n_suffixes, n_buckets));
        for (b, bucket) in self.buckets.iter().enumerate() {
            for &row in &bucket.suffixes {
                basis[(row, b)] = 1.0;
            }
        }

        let largest = self.buckets.iter().map(|b| b.len()).max().unwrap_or(0).max(1) as f64;
        let frequency: Array1<f64> = self
            .buckets
            .iter()
            .map(|b| b.len() as f64 / largest)
            .collect();

        let inverse: Array1<f64> = basis
            .sum_axis(Axis(1))
            .mapv(|count| if count > 0.0 { 1.0 / count } else { 0.0 });
        let peak = inverse.fold(0.0_f64, |acc, &v| acc.max(v));
        let ambiguity = if peak > 0.0 { inverse / peak } else { inverse };

        let weighted = &basis * &frequency + &ambiguity.insert_axis(Axis(1));

        let mut best = (0, 0);
        let mut best_score = f64::NEG_INFINITY;
        for b in 0..n_buckets {
            for s in 0..n_suffixes {
                let score = weighted[(s, b)];
                if score > best_score {
                    best_score = score;
                    best = (b, s);
                }
            }
        }

        let (bucket, suffix) = best;
        tracing::debug!(
            bucket,
            suffix = %self.suffixes[suffix],
            score = best_score,
            "selected morphological seed"
        );

        Ok(Seed {
            bucket,
            suffix: self.suffixes[suffix].clone(),
            score: best_score,
            words: self.buckets[bucket].words_of_suffix(suffix).to_vec(),
        })
    }
}
