//! Classifier trait

use phishguard_core::{ClassifierVerdict, Result};
use std::sync::Arc;

/// Trait for binary ham/spam classifiers
///
/// `predict` must be deterministic for a fixed trained state and input, and
/// the verdict's confidence is the probability of the *predicted* label
/// (the maximum class probability). Implementations are shared read-only
/// across request handlers, hence `Send + Sync`.
pub trait Classifier: Send + Sync {
    /// Predict a label and confidence for the given text
    fn predict(&self, text: &str) -> Result<ClassifierVerdict>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn predict(&self, text: &str) -> Result<ClassifierVerdict> {
        (**self).predict(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, text: &str) -> Result<ClassifierVerdict> {
        (**self).predict(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, text: &str) -> Result<ClassifierVerdict> {
        (**self).predict(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
