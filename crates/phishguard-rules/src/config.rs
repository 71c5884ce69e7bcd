//! Rule set configuration
//!
//! Rule sets can be loaded from YAML so that adding or removing a heuristic
//! is a data change:
//!
//! ```yaml
//! rules:
//!   - name: Urgency language
//!     keywords: [urgent, immediately]
//!   - name: Excessive punctuation
//!     patterns: ['!!+', '\?\?+']
//! ```

use phishguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::{Detector, Rule};

/// Name of the urgency rule
pub const URGENCY_LANGUAGE: &str = "Urgency language";
/// Name of the financial incentive rule
pub const FINANCIAL_INCENTIVE: &str = "Financial incentive";
/// Name of the suspicious request rule
pub const SUSPICIOUS_REQUEST: &str = "Suspicious request";
/// Name of the punctuation rule
pub const EXCESSIVE_PUNCTUATION: &str = "Excessive punctuation";
/// Name of the currency rule
pub const CURRENCY_AMOUNT: &str = "Currency amount mentioned";

/// An ordered list of rule specifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    pub rules: Vec<RuleSpec>,
}

/// A single rule as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Finding name reported when the rule fires
    pub name: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Substring keywords (mutually exclusive with `patterns`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Regular expressions (mutually exclusive with `keywords`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,

    /// Whether this rule is evaluated
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RuleSpec {
    fn keywords(name: &str, description: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            patterns: Vec::new(),
            enabled: true,
        }
    }

    fn patterns(name: &str, description: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            keywords: Vec::new(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            enabled: true,
        }
    }

    /// Compile this spec into a rule
    pub fn build(&self) -> Result<Rule> {
        if self.name.trim().is_empty() {
            return Err(Error::config("rule name must not be empty"));
        }

        let detector = match (self.keywords.is_empty(), self.patterns.is_empty()) {
            (false, true) => Detector::keywords(&self.keywords),
            (true, false) => Detector::patterns(&self.patterns),
            (false, false) => Err(Error::config("rule has both keywords and patterns")),
            (true, true) => Err(Error::config("rule has neither keywords nor patterns")),
        }
        .map_err(|e| Error::config(format!("rule '{}': {}", self.name, e)))?;

        Ok(Rule::new(self.name.clone(), detector))
    }
}

impl RuleSetConfig {
    /// Parse a rule set from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a rule set from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read rule set {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Compile enabled rules, in order
    pub fn build_rules(&self) -> Result<Vec<Rule>> {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for spec in self.rules.iter().filter(|s| s.enabled) {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::config(format!("duplicate rule name '{}'", spec.name)));
            }
            rules.push(spec.build()?);
        }

        Ok(rules)
    }
}

impl Default for RuleSetConfig {
    /// The five built-in phishing heuristics
    fn default() -> Self {
        Self {
            rules: vec![
                RuleSpec::keywords(
                    URGENCY_LANGUAGE,
                    "Urgency and pressure tactics",
                    &["urgent", "immediately", "action required", "account suspended", "verify now"],
                ),
                RuleSpec::keywords(
                    FINANCIAL_INCENTIVE,
                    "Financial incentives and prizes",
                    &["free", "win", "winner", "prize", "reward", "million", "cash", "cashy"],
                ),
                RuleSpec::keywords(
                    SUSPICIOUS_REQUEST,
                    "Requests for credentials or clicks",
                    &["password", "click here", "account verification", "confirm your account", "login"],
                ),
                RuleSpec::patterns(
                    EXCESSIVE_PUNCTUATION,
                    "Repeated exclamation marks, question marks, or dots",
                    &[r"!!+", r"\?\?+", r"\.\.+"],
                ),
                RuleSpec::patterns(
                    CURRENCY_AMOUNT,
                    "Currency symbol followed by a separated amount",
                    &[r"[$£€]\s*\d+[,.]\d+"],
                ),
            ],
        }
    }
}

fn default_true() -> bool {
    true
}
