//! PhishGuard Rules
//!
//! Fast, auditable phishing heuristics that run independently of any
//! statistical model.
//!
//! A rule is a name paired with a detector. Detectors are plain substring
//! sets (Aho-Corasick) or regular expressions; there is no tokenization,
//! stemming, or negation handling. The built-in set covers:
//! - Urgency language
//! - Financial incentives
//! - Suspicious requests
//! - Excessive punctuation
//! - Currency amounts

pub mod config;
pub mod detector;
pub mod engine;

pub use config::{RuleSetConfig, RuleSpec};
pub use detector::Detector;
pub use engine::{Rule, RuleEngine};
