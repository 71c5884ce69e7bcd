//! Offline comparison of the classifier alone against the hybrid decision
//!
//! Labeled samples are read from JSON Lines, one object per line:
//!
//! ```text
//! {"message": "Free entry to win a prize!!", "label": "spam"}
//! {"message": "See you at lunch", "label": "ham"}
//! ```

use phishguard_core::{Error, Label, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use tracing::info;

use crate::HybridDecision;

/// A message with its expected label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMessage {
    pub message: String,
    pub label: Label,
}

/// Parse JSON Lines from a reader, skipping blank lines
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<LabeledMessage>> {
    let mut samples = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let sample: LabeledMessage = serde_json::from_str(&line).map_err(|e| {
            Error::invalid_input(format!("line {}: {}", line_no + 1, e))
        })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Load labeled samples from a JSON Lines file
pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Vec<LabeledMessage>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_jsonl(std::io::BufReader::new(file))
}

/// Confusion counts with spam as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Record one prediction against its expected label
    pub fn record(&mut self, expected: Label, predicted: Label) {
        match (expected, predicted) {
            (Label::Spam, Label::Spam) => self.true_positives += 1,
            (Label::Ham, Label::Spam) => self.false_positives += 1,
            (Label::Ham, Label::Ham) => self.true_negatives += 1,
            (Label::Spam, Label::Ham) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Precision, recall, and F1 treating `label` as the positive class
    pub fn class_metrics(&self, label: Label) -> ClassMetrics {
        // (correct, predicted as label, actually label)
        let (hits, predicted, actual) = match label {
            Label::Spam => (
                self.true_positives,
                self.true_positives + self.false_positives,
                self.true_positives + self.false_negatives,
            ),
            Label::Ham => (
                self.true_negatives,
                self.true_negatives + self.false_negatives,
                self.true_negatives + self.false_positives,
            ),
        };

        ClassMetrics::new(ratio(hits, predicted), ratio(hits, actual), actual)
    }

    /// Unweighted mean over both classes
    pub fn macro_avg(&self) -> ClassMetrics {
        let (ham, spam) = (self.class_metrics(Label::Ham), self.class_metrics(Label::Spam));
        ClassMetrics {
            precision: (ham.precision + spam.precision) / 2.0,
            recall: (ham.recall + spam.recall) / 2.0,
            f1: (ham.f1 + spam.f1) / 2.0,
            support: self.total(),
        }
    }

    /// Mean over both classes weighted by support
    pub fn weighted_avg(&self) -> ClassMetrics {
        let total = self.total();
        if total == 0 {
            return ClassMetrics::default();
        }

        let (ham, spam) = (self.class_metrics(Label::Ham), self.class_metrics(Label::Spam));
        let weigh = |h: f64, s: f64| {
            (h * ham.support as f64 + s * spam.support as f64) / total as f64
        };

        ClassMetrics {
            precision: weigh(ham.precision, spam.precision),
            recall: weigh(ham.recall, spam.recall),
            f1: weigh(ham.f1, spam.f1),
            support: total,
        }
    }
}

/// Scores for one class, or an average over classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,

    /// Number of samples whose expected label is this class
    pub support: usize,
}

impl ClassMetrics {
    fn new(precision: f64, recall: f64, support: usize) -> Self {
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            precision,
            recall,
            f1,
            support,
        }
    }
}

/// Side-by-side results for one labeled set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Number of samples evaluated
    pub samples: usize,

    /// Classifier label alone
    pub classifier: ConfusionMatrix,

    /// Final hybrid label
    pub hybrid: ConfusionMatrix,

    /// Samples where the hybrid label differs from the classifier label
    pub overrides: usize,
}

/// Run both systems over every sample
///
/// Stops at the first classifier failure.
pub fn evaluate(decision: &HybridDecision, samples: &[LabeledMessage]) -> Result<EvaluationReport> {
    let mut report = EvaluationReport::default();

    for sample in samples {
        let verdict = decision.decide(&sample.message)?;
        report.samples += 1;
        report.classifier.record(sample.label, verdict.ai_label);
        report.hybrid.record(sample.label, verdict.final_label);
        if verdict.overridden() {
            report.overrides += 1;
        }
    }

    info!(
        samples = report.samples,
        classifier_accuracy = report.classifier.accuracy(),
        hybrid_accuracy = report.hybrid.accuracy(),
        overrides = report.overrides,
        "evaluation complete"
    );

    Ok(report)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
