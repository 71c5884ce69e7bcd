//! Hybrid decision policy
//!
//! Merges a classifier verdict with a rule report. The policy is biased
//! against letting phishing through, while confident ham calls are never
//! overridden by noisy heuristics. Branches, first match wins:
//!
//! 1. classifier says ham with confidence above the ham trust threshold → ham
//! 2. classifier says spam, or confidence is below the escalation threshold
//!    and any rule fired → spam
//! 3. otherwise → the classifier's label

use phishguard_classifiers::Classifier;
use phishguard_core::{ClassifierVerdict, Error, HybridVerdict, Label, Result, RuleReport};
use phishguard_rules::RuleEngine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Confidence above which a ham verdict is trusted outright
pub const HAM_TRUST_THRESHOLD: f64 = 0.85;

/// Confidence below which a fired rule escalates to spam
pub const ESCALATION_THRESHOLD: f64 = 0.70;

/// Which branch of the policy produced the final label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    /// Confident ham from the classifier
    TrustedHam,
    /// Classifier predicted spam
    ClassifierSpam,
    /// Uncertain classifier and at least one rule fired
    RuleEscalation,
    /// Classifier label used unchanged
    Passthrough,
}

impl fmt::Display for DecisionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TrustedHam => "trusted_ham",
            Self::ClassifierSpam => "classifier_spam",
            Self::RuleEscalation => "rule_escalation",
            Self::Passthrough => "passthrough",
        };
        f.write_str(s)
    }
}

/// Threshold pair defining the three confidence bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridPolicy {
    #[serde(default = "default_ham_trust")]
    pub ham_trust_threshold: f64,

    #[serde(default = "default_escalation")]
    pub escalation_threshold: f64,
}

impl HybridPolicy {
    /// Create a policy with custom thresholds
    pub fn new(ham_trust_threshold: f64, escalation_threshold: f64) -> Result<Self> {
        let policy = Self {
            ham_trust_threshold,
            escalation_threshold,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check thresholds lie in [0, 1] and escalation does not exceed ham trust
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("ham_trust_threshold", self.ham_trust_threshold),
            ("escalation_threshold", self.escalation_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }

        if self.escalation_threshold > self.ham_trust_threshold {
            return Err(Error::config(format!(
                "escalation_threshold ({}) must not exceed ham_trust_threshold ({})",
                self.escalation_threshold, self.ham_trust_threshold
            )));
        }

        Ok(())
    }

    /// Apply the policy to an already computed verdict and report
    pub fn resolve(&self, ai: ClassifierVerdict, report: &RuleReport) -> (Label, DecisionPath) {
        if ai.label == Label::Ham && ai.confidence > self.ham_trust_threshold {
            (Label::Ham, DecisionPath::TrustedHam)
        } else if ai.label == Label::Spam {
            (Label::Spam, DecisionPath::ClassifierSpam)
        } else if ai.confidence < self.escalation_threshold && report.fired() {
            (Label::Spam, DecisionPath::RuleEscalation)
        } else {
            (ai.label, DecisionPath::Passthrough)
        }
    }

    /// Classify text, evaluate rules, and combine the two
    ///
    /// A classifier failure is returned unchanged; rule evaluation cannot fail.
    pub fn decide<C>(&self, text: &str, classifier: &C, rules: &RuleEngine) -> Result<HybridVerdict>
    where
        C: Classifier + ?Sized,
    {
        let ai = classifier.predict(text)?;
        let rule_report = rules.evaluate(text);
        let (final_label, path) = self.resolve(ai, &rule_report);

        debug!(
            classifier = classifier.name(),
            ai_label = %ai.label,
            ai_confidence = ai.confidence,
            rules_fired = rule_report.len(),
            %path,
            final_label = %final_label,
            "hybrid decision"
        );

        Ok(HybridVerdict {
            final_label,
            ai_label: ai.label,
            ai_confidence: ai.confidence,
            rule_report,
        })
    }
}

impl Default for HybridPolicy {
    fn default() -> Self {
        Self {
            ham_trust_threshold: HAM_TRUST_THRESHOLD,
            escalation_threshold: ESCALATION_THRESHOLD,
        }
    }
}

/// Decide with the default thresholds
pub fn decide<C>(text: &str, classifier: &C, rules: &RuleEngine) -> Result<HybridVerdict>
where
    C: Classifier + ?Sized,
{
    HybridPolicy::default().decide(text, classifier, rules)
}

/// A classifier, rule engine, and policy wired together once at start-up
///
/// Cheap to clone; every front end holds one and calls [`HybridDecision::decide`].
#[derive(Clone)]
pub struct HybridDecision {
    classifier: Arc<dyn Classifier>,
    rules: Arc<RuleEngine>,
    policy: HybridPolicy,
}

impl HybridDecision {
    pub fn new(classifier: Arc<dyn Classifier>, rules: Arc<RuleEngine>, policy: HybridPolicy) -> Self {
        Self {
            classifier,
            rules,
            policy,
        }
    }

    /// Decide the final verdict for one message
    pub fn decide(&self, text: &str) -> Result<HybridVerdict> {
        self.policy.decide(text, self.classifier.as_ref(), &self.rules)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn policy(&self) -> &HybridPolicy {
        &self.policy
    }
}

impl fmt::Debug for HybridDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridDecision")
            .field("classifier", &self.classifier.name())
            .field("rules", &self.rules.rules().len())
            .field("policy", &self.policy)
            .finish()
    }
}

fn default_ham_trust() -> f64 {
    HAM_TRUST_THRESHOLD
}

fn default_escalation() -> f64 {
    ESCALATION_THRESHOLD
}
