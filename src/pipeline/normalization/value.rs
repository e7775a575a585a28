use std::sync::LazyLock;

use regex::Regex;

use crate::knowledge::KnownTest;
use crate::models::{PhysiologicalLimits, TestStatus};

/// First numeric token: digits, optional comma grouping, optional decimal fraction.
/// ASCII digits only.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").unwrap());

/// Outcome of checking a parsed value against a known test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueCheck {
    Accepted(TestStatus),
    Implausible(PhysiologicalLimits),
}

/// Extract the first numeric value on a line ("12,345.6" → 12345.6).
///
/// Returns `None` when the line has no numeric token or the token does not
/// fit a finite `f64`.
pub fn parse_value(line: &str) -> Option<f64> {
    let token = NUMERIC_TOKEN.find(line)?.as_str().replace(',', "");
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reject physiologically impossible values, then classify against the reference range.
pub fn check_value(test: &KnownTest, value: f64) -> ValueCheck {
    if let Some(limits) = test.physiological_limits {
        if !limits.admits(value) {
            return ValueCheck::Implausible(limits);
        }
    }
    ValueCheck::Accepted(TestStatus::classify(value, &test.ref_range))
}
