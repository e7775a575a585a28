use super::matcher::NameMatcher;
use super::value::{check_value, parse_value, ValueCheck};
use crate::models::{NormalizedTest, PhysiologicalLimits};
use crate::pipeline::extraction::CandidateLine;

/// Why a candidate line contributed nothing. Logged, never surfaced to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum LineRejection {
    /// Best name score fell below the acceptance threshold.
    NoMatch { best_score: f64 },
    /// Name matched but the line holds no usable number.
    NoValue { test: String },
    /// Value outside the test's physiological limits.
    Implausible {
        test: String,
        value: f64,
        limits: PhysiologicalLimits,
    },
}

impl LineRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoMatch { .. } => "no_match",
            Self::NoValue { .. } => "no_value",
            Self::Implausible { .. } => "implausible",
        }
    }
}

/// Result of normalizing a batch of candidate lines.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizationOutcome {
    /// At least one line produced a test, in input order.
    Normalized(Vec<NormalizedTest>),
    /// Lines were processed but none survived.
    NothingMatched,
}

/// Runs name matching and value validation over candidate lines.
pub struct Normalizer<'a> {
    matcher: NameMatcher<'a>,
}

impl<'a> Normalizer<'a> {
    pub fn new(matcher: NameMatcher<'a>) -> Self {
        Self { matcher }
    }

    /// Normalize one line: match name, parse value, check plausibility, classify.
    pub fn normalize_line(&self, line: &CandidateLine) -> Result<NormalizedTest, LineRejection> {
        let text = line.as_str();

        let matched = self
            .matcher
            .match_line(text)
            .map_err(|best_score| LineRejection::NoMatch { best_score })?;
        let test = matched.test;

        let value = parse_value(text).ok_or_else(|| LineRejection::NoValue {
            test: test.name.clone(),
        })?;

        match check_value(test, value) {
            ValueCheck::Accepted(status) => Ok(NormalizedTest {
                name: test.name.clone(),
                value,
                unit: test.unit.clone(),
                status,
                ref_range: test.ref_range,
            }),
            ValueCheck::Implausible(limits) => Err(LineRejection::Implausible {
                test: test.name.clone(),
                value,
                limits,
            }),
        }
    }

    /// Normalize every line independently; failing lines are dropped.
    pub fn normalize(&self, lines: &[CandidateLine]) -> NormalizationOutcome {
        let mut tests = Vec::with_capacity(lines.len());

        for (line_index, line) in lines.iter().enumerate() {
            match self.normalize_line(line) {
                Ok(test) => {
                    tracing::debug!(
                        line_index,
                        test = %test.name,
                        value = test.value,
                        status = test.status.as_str(),
                        "Line normalized"
                    );
                    tests.push(test);
                }
                Err(rejection) => {
                    if let LineRejection::Implausible { test, value, limits } = &rejection {
                        tracing::debug!(
                            line_index,
                            test = %test,
                            value,
                            min = limits.min,
                            max = limits.max,
                            "Value outside physiological limits, skipping"
                        );
                    } else {
                        tracing::debug!(line_index, reason = rejection.kind(), "Line skipped");
                    }
                }
            }
        }

        tracing::info!(
            lines = lines.len(),
            normalized = tests.len(),
            "Normalization complete"
        );

        if tests.is_empty() {
            NormalizationOutcome::NothingMatched
        } else {
            NormalizationOutcome::Normalized(tests)
        }
    }
}
