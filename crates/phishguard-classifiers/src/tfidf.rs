//! TF-IDF text vectorization (inference side)
//!
//! Transforms text with a vocabulary and IDF weights fitted elsewhere:
//! lowercase, extract word tokens of two or more characters, drop stop
//! words, build n-grams, weight term counts by IDF, and L2-normalize.

use phishguard_core::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Token pattern: runs of two or more word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// A fitted TF-IDF vectorizer
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    stop_words: HashSet<String>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    token_regex: Regex,
}

impl TfidfVectorizer {
    /// Create a vectorizer, validating that the vocabulary fits the IDF table
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        stop_words: impl IntoIterator<Item = String>,
        ngram_range: (usize, usize),
        sublinear_tf: bool,
    ) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::model(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        if let Some((term, &index)) = vocabulary.iter().find(|(_, &i)| i >= idf.len()) {
            return Err(Error::model(format!(
                "vocabulary term '{}' has index {} but only {} idf weights exist",
                term,
                index,
                idf.len()
            )));
        }

        if idf.iter().any(|w| !w.is_finite()) {
            return Err(Error::model("idf weights must be finite"));
        }

        let token_regex = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::model(format!("Failed to compile token pattern: {}", e)))?;

        Ok(Self {
            vocabulary,
            idf,
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
            ngram_range,
            sublinear_tf,
            token_regex,
        })
    }

    /// Number of features produced by `transform`
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Split text into lowercased tokens with stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Transform text into a sparse, L2-normalized TF-IDF vector
    ///
    /// Entries are `(feature index, weight)` sorted by index. Terms outside
    /// the vocabulary are ignored.
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0) += 1;
                }
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (index, tf * self.idf[index])
            })
            .collect();

        let norm = features.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut features {
                *w /= norm;
            }
        }

        features
    }
}
