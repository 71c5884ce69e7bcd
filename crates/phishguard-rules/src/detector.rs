//! Detectors: the match half of a rule

use aho_corasick::AhoCorasick;
use phishguard_core::{Error, Result};
use regex::{Regex, RegexBuilder};

/// A pure predicate over lowercased message text
#[derive(Debug, Clone)]
pub enum Detector {
    /// Fires when any keyword occurs as a substring
    Keywords {
        matcher: AhoCorasick,
        keywords: Vec<String>,
    },

    /// Fires when any pattern matches, ignoring case
    Patterns(Vec<Regex>),
}

impl Detector {
    /// Build a keyword detector using Aho-Corasick
    pub fn keywords<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();

        if keywords.is_empty() {
            return Err(Error::config("keyword detector needs at least one keyword"));
        }
        if keywords.iter().any(|k| k.is_empty()) {
            return Err(Error::config("keywords must not be empty strings"));
        }

        let matcher = AhoCorasick::new(&keywords)
            .map_err(|e| Error::config(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self::Keywords { matcher, keywords })
    }

    /// Build a pattern detector from regex sources
    ///
    /// Patterns are compiled case-insensitive so that `URGENT` in a rule set
    /// still matches the lowercased text.
    pub fn patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|p| {
                RegexBuilder::new(p.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        Error::config(format!("Failed to compile pattern '{}': {}", p.as_ref(), e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        if compiled.is_empty() {
            return Err(Error::config("pattern detector needs at least one pattern"));
        }

        Ok(Self::Patterns(compiled))
    }

    /// Check the detector against text that has already been lowercased
    pub fn is_match(&self, lowered: &str) -> bool {
        match self {
            Self::Keywords { matcher, .. } => matcher.is_match(lowered),
            Self::Patterns(patterns) => patterns.iter().any(|p| p.is_match(lowered)),
        }
    }
}
