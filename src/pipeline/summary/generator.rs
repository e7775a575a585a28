use serde::Serialize;

use super::guardrail::{find_unattributed_mention, hallucination_reason};
use super::templates::ExplanationTemplates;
use crate::knowledge::KnowledgeBase;
use crate::models::NormalizedTest;

/// Summary used when every result is within its reference range.
pub const ALL_NORMAL_SUMMARY: &str = "All test results appear to be within the normal range.";

/// Terminal outcome of summary generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SummaryResult {
    Ok {
        summary: String,
        explanations: Vec<String>,
    },
    /// The guardrail refused to emit the summary.
    Unprocessed { reason: String },
}

/// Builds the patient-facing summary from templates, then runs the
/// hallucination guardrail before anything is returned.
pub struct SummaryGenerator<'a> {
    kb: &'a KnowledgeBase,
    templates: &'a ExplanationTemplates,
}

impl<'a> SummaryGenerator<'a> {
    pub fn new(kb: &'a KnowledgeBase, templates: &'a ExplanationTemplates) -> Self {
        Self { kb, templates }
    }

    pub fn generate(&self, tests: &[NormalizedTest]) -> SummaryResult {
        let abnormal: Vec<&NormalizedTest> =
            tests.iter().filter(|t| t.status.is_abnormal()).collect();

        if abnormal.is_empty() {
            return SummaryResult::Ok {
                summary: ALL_NORMAL_SUMMARY.to_string(),
                explanations: Vec::new(),
            };
        }

        let clauses: Vec<String> = abnormal
            .iter()
            .map(|t| format!("{} {}", t.status.as_str(), t.name.to_lowercase()))
            .collect();
        let summary = format!("Your results show {}.", clauses.join(" and "));

        let explanations: Vec<String> = abnormal
            .iter()
            .filter_map(|t| self.templates.lookup(&t.name, t.status))
            .map(str::to_string)
            .collect();

        if let Some(leaked) = find_unattributed_mention(&explanations, &abnormal, self.kb) {
            tracing::warn!(
                test = leaked,
                abnormal = abnormal.len(),
                "Summary blocked: explanation mentions a test that was not flagged"
            );
            return SummaryResult::Unprocessed {
                reason: hallucination_reason(leaked),
            };
        }

        SummaryResult::Ok {
            summary,
            explanations,
        }
    }
}
