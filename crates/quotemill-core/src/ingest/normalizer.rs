use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Boilerplate the bank appends to every outbound mail. Both patterns run
/// case-insensitively with `.` matching newlines, so each one erases from
/// its anchor text to the end of the body.
pub const DEFAULT_BOILERPLATE_PATTERNS: [&str; 2] = [r"UOB EMAIL DISCLAIMER.*$", r"CAUTION:.*$"];

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Invalid boilerplate pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Removes disclaimer/boilerplate blocks from an email body before it is
/// handed to the model.
#[derive(Debug)]
pub struct BoilerplateStripper {
    patterns: Vec<Regex>,
}

impl BoilerplateStripper {
    /// Stripper with the default disclaimer patterns.
    pub fn new() -> NormalizeResult<Self> {
        Self::with_patterns(DEFAULT_BOILERPLATE_PATTERNS)
    }

    /// Stripper with caller-supplied patterns, compiled case-insensitive
    /// and dot-matches-newline.
    pub fn with_patterns<I, S>(patterns: I) -> NormalizeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|source| NormalizeError::Pattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<NormalizeResult<Vec<_>>>()?;

        Ok(Self { patterns: compiled })
    }

    /// Add one more pattern to this stripper.
    pub fn with_pattern(mut self, pattern: &str) -> NormalizeResult<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| NormalizeError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        self.patterns.push(compiled);
        Ok(self)
    }

    #[must_use]
    pub fn strip(&self, body: &str) -> String {
        let mut out = body.to_string();
        for pattern in &self.patterns {
            out = pattern.replace_all(&out, "").into_owned();
        }
        out.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_disclaimer_to_end() {
        let stripper = BoilerplateStripper::new().unwrap();
        let body = "Hi Lionel,\nPlease quote 2TB SSD.\n\nUOB EMAIL DISCLAIMER\nThis message is confidential.\nMore legal text.";

        let clean = stripper.strip(body);

        assert!(clean.contains("Please quote 2TB SSD."));
        assert!(!clean.contains("DISCLAIMER"));
        assert!(!clean.contains("legal text"));
    }

    #[test]
    fn test_strips_caution_banner_case_insensitive() {
        let stripper = BoilerplateStripper::new().unwrap();
        let body = "Quote request below.\ncaution: this email originated outside the bank\ntrailing junk";

        let clean = stripper.strip(body);
        assert_eq!(clean, "Quote request below.");
    }

    #[test]
    fn test_clean_body_unchanged() {
        let stripper = BoilerplateStripper::new().unwrap();
        assert_eq!(stripper.strip("  Hi there  "), "Hi there");
    }

    #[test]
    fn test_custom_pattern() {
        let stripper = BoilerplateStripper::new()
            .unwrap()
            .with_pattern(r"Sent from my iPhone.*$")
            .unwrap();

        let clean = stripper.strip("Body text\nSent from my iPhone\nsignature");
        assert_eq!(clean, "Body text");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = BoilerplateStripper::with_patterns(["("]).unwrap_err();
        assert!(matches!(err, NormalizeError::Pattern { pattern, .. } if pattern == "("));
    }
}
