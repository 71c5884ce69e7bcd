//! PhishGuard Policy
//!
//! Reconciles a probabilistic classifier with the deterministic rule engine
//! into one conservative verdict.
//!
//! Three confidence bands get asymmetric treatment:
//! - confident ham (> 0.85) is authoritative
//! - any spam call from the classifier is authoritative
//! - uncertain ham (< 0.70) is escalated to spam when a rule fired
//!
//! Everything else passes the classifier's label through.

pub mod evaluation;
pub mod hybrid;

pub use evaluation::{
    evaluate, load_jsonl, ClassMetrics, ConfusionMatrix, EvaluationReport, LabeledMessage,
};
pub use hybrid::{
    decide, DecisionPath, HybridDecision, HybridPolicy, ESCALATION_THRESHOLD, HAM_TRUST_THRESHOLD,
};
