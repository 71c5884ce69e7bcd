//! PhishGuard Classifiers
//!
//! Statistical message classifiers consumed by the hybrid decision.
//!
//! The [`Classifier`] trait is the only contract the decision layer relies
//! on: a binary ham/spam label plus the probability of that label. Models
//! are constructed once at start-up and passed in explicitly, so any
//! implementation (including test doubles) can be injected.
//!
//! [`TfidfLinearClassifier`] loads a logistic-regression model over TF-IDF
//! features from a JSON export.

pub mod classifier;
pub mod linear;
pub mod tfidf;

pub use classifier::Classifier;
pub use linear::{LinearModelSpec, TfidfLinearClassifier};
pub use tfidf::TfidfVectorizer;
