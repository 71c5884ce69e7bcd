//! Application wiring shared by every front end

use anyhow::{anyhow, Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use phishguard_classifiers::TfidfLinearClassifier;
use phishguard_policy::HybridDecision;
use phishguard_rules::RuleEngine;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;

/// Load the classifier and rule set once and wire them into a decision
pub fn build_decision(config: &AppConfig) -> Result<HybridDecision> {
    let model_path = config
        .model_path
        .as_ref()
        .ok_or_else(|| anyhow!("no model configured: set model_path or pass --model"))?;

    let classifier = TfidfLinearClassifier::from_file(model_path)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    let rules = match &config.rules_path {
        Some(path) => RuleEngine::from_file(path)
            .with_context(|| format!("loading rule set {}", path.display()))?,
        None => RuleEngine::builtin()?,
    };

    config.policy.validate()?;

    info!(
        rules = rules.rules().len(),
        ham_trust_threshold = config.policy.ham_trust_threshold,
        escalation_threshold = config.policy.escalation_threshold,
        "Hybrid decision ready"
    );

    Ok(HybridDecision::new(
        Arc::new(classifier),
        Arc::new(rules),
        config.policy,
    ))
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Classifier, rules, and policy
    pub decision: HybridDecision,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,

    /// Largest accepted message, in bytes
    pub max_message_bytes: usize,
}

impl AppState {
    pub fn new(
        decision: HybridDecision,
        metrics_handle: PrometheusHandle,
        max_message_bytes: usize,
    ) -> Self {
        Self {
            decision,
            metrics_handle,
            max_message_bytes,
        }
    }
}
