use std::fmt;

use serde::Serialize;

use super::sanitize::sanitize_line;

/// A trimmed report line containing at least one decimal digit.
///
/// Only constructible through [`extract_candidate_lines`], so the digit
/// invariant holds for every value in circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateLine(String);

impl CandidateLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parse(raw: &str) -> Option<Self> {
        let clean = sanitize_line(raw);
        let trimmed = clean.trim();
        trimmed
            .chars()
            .any(|c| c.is_ascii_digit())
            .then(|| Self(trimmed.to_string()))
    }
}

impl fmt::Display for CandidateLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CandidateLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split raw report text into candidate result lines.
///
/// Digit-free lines (headers, patient names, comments) are dropped before the
/// fuzzy matcher ever sees them. An empty result means "no test data found";
/// callers must check for it.
pub fn extract_candidate_lines(text: &str) -> Vec<CandidateLine> {
    text.lines().filter_map(CandidateLine::parse).collect()
}
