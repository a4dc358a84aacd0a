use crate::config::LimitsConfig;
use crate::error::ValidationError;
use anyhow::Context;
use regex::{RegexSet, RegexSetBuilder};

/// User text that passed validation: trimmed, bounded and denylist-clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidText(String);

impl ValidText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Stateless gate for inbound user text.
///
/// Rejects rather than sanitizes: accepted text is returned trimmed but
/// otherwise byte-for-byte as received.
#[derive(Debug, Clone)]
pub struct InputValidator {
    max_chars: usize,
    denylist: RegexSet,
}

impl InputValidator {
    pub fn new(max_chars: usize, patterns: &[String]) -> Result<Self, regex::Error> {
        let denylist = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            max_chars,
            denylist,
        })
    }

    pub fn from_config(limits: &LimitsConfig) -> anyhow::Result<Self> {
        Self::new(limits.max_message_chars, &limits.denylist)
            .context("compile limits.denylist patterns")
    }

    pub fn validate(&self, raw: &str) -> Result<ValidText, ValidationError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty);
        }
        if text.chars().count() > self.max_chars {
            return Err(ValidationError::TooLong {
                max: self.max_chars,
            });
        }
        if self.denylist.is_match(text) {
            return Err(ValidationError::Unsafe);
        }
        Ok(ValidText(text.to_string()))
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        let limits = LimitsConfig::default();
        Self::new(limits.max_message_chars, &limits.denylist).unwrap_or_else(|_| Self {
            max_chars: limits.max_message_chars,
            denylist: RegexSet::empty(),
        })
    }
}
