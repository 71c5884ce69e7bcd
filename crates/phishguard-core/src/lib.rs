//! PhishGuard Core
//!
//! Core types shared across PhishGuard components.
//!
//! This crate provides:
//! - Messages, labels, and classifier verdicts
//! - Rule reports and the final hybrid verdict
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassifierVerdict, HybridVerdict, Label, Message, RuleFinding, RuleReport};
