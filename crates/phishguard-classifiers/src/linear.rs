//! Logistic-regression classifier over TF-IDF features
//!
//! The model is exported by an external training pipeline as JSON:
//!
//! ```json
//! {
//!   "name": "sms-spam-v1",
//!   "vocabulary": {"free": 0, "click here": 1},
//!   "idf": [2.1, 3.4],
//!   "weights": [1.7, 2.2],
//!   "intercept": -0.4,
//!   "ngram_range": [1, 2],
//!   "stop_words": ["the", "and"],
//!   "sublinear_tf": false
//! }
//! ```

use phishguard_core::{ClassifierVerdict, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::tfidf::TfidfVectorizer;

/// Serialized form of a linear TF-IDF model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelSpec {
    /// Model name reported by the classifier
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Term to feature index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature
    pub idf: Vec<f64>,

    /// Spam-class coefficient per feature
    pub weights: Vec<f64>,

    /// Spam-class intercept
    #[serde(default)]
    pub intercept: f64,

    /// Inclusive n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Tokens removed before n-gram construction
    #[serde(default)]
    pub stop_words: Vec<String>,

    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    pub sublinear_tf: bool,
}

/// TF-IDF + logistic regression classifier
#[derive(Debug, Clone)]
pub struct TfidfLinearClassifier {
    name: String,
    vectorizer: TfidfVectorizer,
    weights: Vec<f64>,
    intercept: f64,
}

impl TfidfLinearClassifier {
    /// Build a classifier from a model specification
    pub fn from_spec(spec: LinearModelSpec) -> Result<Self> {
        if spec.weights.len() != spec.idf.len() {
            return Err(Error::model(format!(
                "model has {} weights but {} idf entries",
                spec.weights.len(),
                spec.idf.len()
            )));
        }

        if !spec.intercept.is_finite() || spec.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::model("model coefficients must be finite"));
        }

        let vectorizer = TfidfVectorizer::new(
            spec.vocabulary,
            spec.idf,
            spec.stop_words,
            spec.ngram_range,
            spec.sublinear_tf,
        )?;

        Ok(Self {
            name: spec.name,
            vectorizer,
            weights: spec.weights,
            intercept: spec.intercept,
        })
    }

    /// Parse a model from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: LinearModelSpec = serde_json::from_str(json)
            .map_err(|e| Error::model(format!("Failed to parse model: {}", e)))?;
        Self::from_spec(spec)
    }

    /// Load a model from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::model(format!("Failed to read model {}: {}", path.display(), e))
        })?;
        let classifier = Self::from_json(&content)?;

        info!(
            "Loaded model '{}' ({} features) from {}",
            classifier.name,
            classifier.vectorizer.dimension(),
            path.display()
        );

        Ok(classifier)
    }

    /// Raw decision value `w·x + b` (positive means spam)
    pub fn decision_function(&self, text: &str) -> Result<f64> {
        let features = self.vectorizer.transform(text);

        let mut score = self.intercept;
        for (index, value) in features {
            let weight = self.weights.get(index).ok_or_else(|| {
                Error::classifier(format!(
                    "feature index {} exceeds model dimension {}",
                    index,
                    self.weights.len()
                ))
            })?;
            score += weight * value;
        }

        if !score.is_finite() {
            return Err(Error::classifier("decision value is not finite"));
        }

        Ok(score)
    }

    /// Probability of the spam class
    pub fn spam_probability(&self, text: &str) -> Result<f64> {
        Ok(sigmoid(self.decision_function(text)?))
    }
}

impl Classifier for TfidfLinearClassifier {
    fn predict(&self, text: &str) -> Result<ClassifierVerdict> {
        let p_spam = self.spam_probability(text)?;
        let verdict = ClassifierVerdict::from_probabilities(1.0 - p_spam, p_spam)?;

        debug!(
            model = %self.name,
            label = %verdict.label,
            confidence = verdict.confidence,
            "classifier prediction"
        );

        Ok(verdict)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn default_model_name() -> String {
    "tfidf-linear".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}
