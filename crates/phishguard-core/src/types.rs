//! Core types for PhishGuard

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Binary message label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate message (class 0)
    Ham,
    /// Phishing or unwanted message (class 1)
    Spam,
}

impl Label {
    pub fn is_spam(&self) -> bool {
        matches!(self, Self::Spam)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" | "0" => Ok(Self::Ham),
            "spam" | "1" => Ok(Self::Spam),
            other => Err(Error::invalid_input(format!("unknown label '{}'", other))),
        }
    }
}

/// A piece of text to be classified
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message {
    text: String,
}

impl Message {
    /// Create a message from text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Create a message from raw bytes, rejecting anything that is not UTF-8
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map(Self::new)
            .map_err(|e| Error::invalid_input(format!("message is not valid UTF-8: {}", e)))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Leading characters of the message, with an ellipsis when truncated
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Name of a heuristic rule that fired
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleFinding(String);

impl RuleFinding {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of evaluating every rule against one message
///
/// Findings keep rule definition order. Whether anything fired is derived
/// from the findings, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleReport {
    findings: Vec<RuleFinding>,
}

impl RuleReport {
    pub fn new(findings: Vec<RuleFinding>) -> Self {
        Self { findings }
    }

    /// True when at least one rule fired
    pub fn fired(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn findings(&self) -> &[RuleFinding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Check whether a rule with the given name fired
    pub fn contains(&self, name: &str) -> bool {
        self.findings.iter().any(|f| f.name() == name)
    }
}

/// Output of a statistical classifier for one message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    /// Predicted label
    pub label: Label,

    /// Probability assigned to the predicted label (0.0-1.0)
    pub confidence: f64,
}

impl ClassifierVerdict {
    /// Create a verdict, rejecting confidences outside [0, 1]
    pub fn new(label: Label, confidence: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::classifier(format!(
                "confidence {} is outside [0, 1]",
                confidence
            )));
        }
        Ok(Self { label, confidence })
    }

    /// Build a verdict from per-class probabilities `[p_ham, p_spam]`
    ///
    /// The predicted label is the most probable class; ties go to ham.
    pub fn from_probabilities(p_ham: f64, p_spam: f64) -> Result<Self> {
        if p_spam > p_ham {
            Self::new(Label::Spam, p_spam)
        } else {
            Self::new(Label::Ham, p_ham)
        }
    }
}

/// Final output of the hybrid decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridVerdict {
    /// Final label after applying the policy
    pub final_label: Label,

    /// Label the classifier predicted
    pub ai_label: Label,

    /// Classifier confidence in its own label
    pub ai_confidence: f64,

    /// Rule engine findings
    pub rule_report: RuleReport,
}

impl HybridVerdict {
    pub fn is_spam(&self) -> bool {
        self.final_label.is_spam()
    }

    /// True when the final label differs from the classifier's label
    pub fn overridden(&self) -> bool {
        self.final_label != self.ai_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse() {
        assert_eq!("1".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!("SPAM".parse::<Label>().unwrap(), Label::Spam);
        assert!("phish".parse::<Label>().is_err());
    }

    #[test]
    fn test_label_serde() {
        assert_eq!(serde_json::to_string(&Label::Ham).unwrap(), "\"ham\"");
        let label: Label = serde_json::from_str("\"spam\"").unwrap();
        assert_eq!(label, Label::Spam);
    }

    #[test]
    fn test_message_from_bytes() {
        let msg = Message::from_bytes(b"hello".to_vec()).unwrap();
        assert_eq!(msg.as_str(), "hello");

        let err = Message::from_bytes(vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_message_preview() {
        let msg = Message::new("héllo world");
        assert_eq!(msg.preview(5), "héllo...");
        assert_eq!(msg.preview(100), "héllo world");
        assert_eq!(Message::default().preview(3), "");
    }

    #[test]
    fn test_rule_report_fired_is_derived() {
        let empty = RuleReport::default();
        assert!(!empty.fired());
        assert!(empty.is_empty());

        let report = RuleReport::new(vec![RuleFinding::new("Urgency language")]);
        assert!(report.fired());
        assert!(report.contains("Urgency language"));
        assert!(!report.contains("Suspicious request"));
    }

    #[test]
    fn test_verdict_confidence_bounds() {
        assert!(ClassifierVerdict::new(Label::Ham, 0.5).is_ok());
        assert!(ClassifierVerdict::new(Label::Ham, 1.2).is_err());
        assert!(ClassifierVerdict::new(Label::Spam, -0.1).is_err());
        assert!(ClassifierVerdict::new(Label::Spam, f64::NAN).is_err());
    }

    #[test]
    fn test_verdict_from_probabilities_uses_max_class() {
        let v = ClassifierVerdict::from_probabilities(0.3, 0.7).unwrap();
        assert_eq!(v.label, Label::Spam);
        assert!((v.confidence - 0.7).abs() < f64::EPSILON);

        let v = ClassifierVerdict::from_probabilities(0.9, 0.1).unwrap();
        assert_eq!(v.label, Label::Ham);
        assert!((v.confidence - 0.9).abs() < f64::EPSILON);

        let tie = ClassifierVerdict::from_probabilities(0.5, 0.5).unwrap();
        assert_eq!(tie.label, Label::Ham);
    }
}
