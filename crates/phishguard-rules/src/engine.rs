//! Rule evaluation engine

use phishguard_core::{Result, RuleFinding, RuleReport};
use std::path::Path;
use tracing::{debug, info};

use crate::{Detector, RuleSetConfig};

/// A named heuristic
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    detector: Detector,
}

impl Rule {
    pub fn new(name: impl Into<String>, detector: Detector) -> Self {
        Self {
            name: name.into(),
            detector,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Evaluates an ordered set of independent rules against message text
///
/// Matching is case-insensitive: text is lowercased once and every detector
/// sees the lowercased form. The engine is immutable after construction and
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create an engine from already-built rules
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Create an engine with the built-in phishing heuristics
    pub fn builtin() -> Result<Self> {
        Self::from_config(&RuleSetConfig::default())
    }

    /// Create an engine from a rule set configuration
    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        Ok(Self::new(config.build_rules()?))
    }

    /// Load a YAML rule set from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let engine = Self::from_config(&RuleSetConfig::from_file(path)?)?;
        info!("Loaded {} rules from {}", engine.rules.len(), path.display());
        Ok(engine)
    }

    /// Evaluate all rules; findings keep rule definition order
    pub fn evaluate(&self, text: &str) -> RuleReport {
        let lowered = text.to_lowercase();

        let findings: Vec<RuleFinding> = self
            .rules
            .iter()
            .filter(|rule| rule.detector.is_match(&lowered))
            .map(|rule| RuleFinding::new(rule.name.as_str()))
            .collect();

        debug!(fired = findings.len(), total = self.rules.len(), "rules evaluated");

        RuleReport::new(findings)
    }

    /// Get loaded rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::builtin().expect("built-in rule set must compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;

    fn names(report: &RuleReport) -> Vec<&str> {
        report.findings().iter().map(|f| f.name()).collect()
    }

    #[test]
    fn test_empty_text_fires_nothing() {
        let report = RuleEngine::default().evaluate("");
        assert!(!report.fired());
        assert!(report.is_empty());
    }

    #[test]
    fn test_each_builtin_rule() {
        let engine = RuleEngine::default();

        let cases = [
            ("Action required on your profile", URGENCY_LANGUAGE),
            ("Claim your reward", FINANCIAL_INCENTIVE),
            ("Confirm your account details", SUSPICIOUS_REQUEST),
            ("wait...", EXCESSIVE_PUNCTUATION),
            ("pay €5.50 today", CURRENCY_AMOUNT),
        ];

        for (text, expected) in cases {
            let report = engine.evaluate(text);
            assert_eq!(names(&report), vec![expected], "text: {}", text);
        }
    }

    #[test]
    fn test_findings_keep_definition_order() {
        let engine = RuleEngine::default();
        let report = engine.evaluate("£1,000 prize!! Login immediately");
        assert_eq!(
            names(&report),
            vec![
                URGENCY_LANGUAGE,
                FINANCIAL_INCENTIVE,
                SUSPICIOUS_REQUEST,
                EXCESSIVE_PUNCTUATION,
                CURRENCY_AMOUNT,
            ]
        );
    }

    #[test]
    fn test_currency_requires_separator() {
        let engine = RuleEngine::default();
        assert!(engine.evaluate("$ 12.99").contains(CURRENCY_AMOUNT));
        assert!(!engine.evaluate("$1000").contains(CURRENCY_AMOUNT));
        assert!(!engine.evaluate("1,000 dollars").contains(CURRENCY_AMOUNT));
    }

    #[test]
    fn test_single_punctuation_does_not_fire() {
        let report = RuleEngine::default().evaluate("Hello! How are you? Fine.");
        assert!(!report.contains(EXCESSIVE_PUNCTUATION));
    }

    #[test]
    fn test_custom_rules() {
        let engine = RuleEngine::new(vec![Rule::new(
            "Shortened link",
            Detector::keywords(["bit.ly"]).unwrap(),
        )]);
        assert_eq!(engine.rules().len(), 1);
        assert!(engine.evaluate("see BIT.LY/x").contains("Shortened link"));
    }
}
