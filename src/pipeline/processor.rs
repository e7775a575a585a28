//! Report pipeline entry point: raw text in, validated results and summary out.
//!
//! Stages run strictly forward: line extraction → normalization → summary.
//! Each request builds its own borrowed matcher/normalizer/generator over the
//! shared, read-only knowledge base and template table.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::extraction::extract_candidate_lines;
use super::normalization::{
    NameMatcher, NormalizationOutcome, Normalizer, SimilarityScorer, WeightedRatio,
};
use super::summary::{ExplanationTemplates, SummaryGenerator, SummaryResult};
use crate::knowledge::{KnowledgeBase, KnowledgeBaseError};
use crate::models::NormalizedTest;
use crate::pipeline_config::PipelineConfig;

/// Reason reported when no line survives normalization.
pub const NOTHING_NORMALIZED_REASON: &str = "Could not normalize any valid tests from the input.";

/// Request-level input errors. The pipeline does not run past these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("No valid test lines found in the input.")]
    NoTestLines,
}

/// Structured output of a fully successful run.
///
/// Only built by [`ReportPipeline::process`] once every stage succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalOutput {
    tests: Vec<NormalizedTest>,
    summary: String,
    explanations: Vec<String>,
}

impl FinalOutput {
    pub fn tests(&self) -> &[NormalizedTest] {
        &self.tests
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }
}

/// Non-error pipeline result. Serializes with a `status` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PipelineOutcome {
    #[serde(rename = "ok")]
    Completed(FinalOutput),
    /// Processed, but nothing could be safely reported.
    Unprocessed { reason: String },
}

/// The three-stage report pipeline with its injected collaborators.
pub struct ReportPipeline {
    kb: Arc<KnowledgeBase>,
    templates: Arc<ExplanationTemplates>,
    scorer: Box<dyn SimilarityScorer + Send + Sync>,
    config: PipelineConfig,
}

impl ReportPipeline {
    /// Pipeline over `kb` with built-in templates and the weighted-ratio scorer.
    pub fn new(kb: Arc<KnowledgeBase>, config: PipelineConfig) -> Self {
        Self {
            kb,
            templates: Arc::new(ExplanationTemplates::builtin()),
            scorer: Box::new(WeightedRatio),
            config,
        }
    }

    /// Pipeline over the bundled knowledge base.
    pub fn builtin(config: PipelineConfig) -> Result<Self, KnowledgeBaseError> {
        Ok(Self::new(Arc::new(KnowledgeBase::builtin()?), config))
    }

    pub fn with_templates(mut self, templates: Arc<ExplanationTemplates>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer + Send + Sync>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline on raw report text.
    pub fn process(&self, raw_text: &str) -> Result<PipelineOutcome, PipelineError> {
        let lines = extract_candidate_lines(raw_text);
        if lines.is_empty() {
            tracing::info!("No candidate lines in input");
            return Err(PipelineError::NoTestLines);
        }

        let matcher = NameMatcher::new(&self.kb, self.scorer.as_ref(), self.config.match_threshold);
        let tests = match Normalizer::new(matcher).normalize(&lines) {
            NormalizationOutcome::Normalized(tests) => tests,
            NormalizationOutcome::NothingMatched => {
                tracing::info!(lines = lines.len(), "No line normalized");
                return Ok(PipelineOutcome::Unprocessed {
                    reason: NOTHING_NORMALIZED_REASON.to_string(),
                });
            }
        };

        match SummaryGenerator::new(&self.kb, &self.templates).generate(&tests) {
            SummaryResult::Ok {
                summary,
                explanations,
            } => Ok(PipelineOutcome::Completed(FinalOutput {
                tests,
                summary,
                explanations,
            })),
            SummaryResult::Unprocessed { reason } => Ok(PipelineOutcome::Unprocessed { reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestStatus;

    fn pipeline() -> ReportPipeline {
        ReportPipeline::builtin(PipelineConfig::default()).unwrap()
    }

    fn completed(outcome: PipelineOutcome) -> FinalOutput {
        match outcome {
            PipelineOutcome::Completed(output) => output,
            other => panic!("expected completed, got {other:?}"),
        }
    }

    #[test]
    fn scenario_low_hemoglobin_normal_wbc() {
        let output = completed(pipeline().process("Hemoglobin 10.5 g/dL\nWBC 7500 /uL").unwrap());

        assert_eq!(output.tests().len(), 2);
        assert_eq!(output.tests()[0].name, "Hemoglobin");
        assert_eq!(output.tests()[0].value, 10.5);
        assert_eq!(output.tests()[0].status, TestStatus::Low);
        assert_eq!(output.tests()[1].name, "WBC");
        assert_eq!(output.tests()[1].value, 7500.0);
        assert_eq!(output.tests()[1].status, TestStatus::Normal);

        assert_eq!(output.summary(), "Your results show low hemoglobin.");
        assert!(!output.summary().contains("wbc"));
        assert_eq!(output.explanations().len(), 1);
        assert!(output.explanations()[0].contains("anemia"));
    }

    #[test]
    fn scenario_typo_matches_hemoglobin() {
        let typo = completed(pipeline().process("Hemglobin: 10.5").unwrap());
        let clean = completed(pipeline().process("Hemoglobin 10.5 g/dL").unwrap());
        assert_eq!(typo.tests(), clean.tests());
    }

    #[test]
    fn scenario_implausible_only_line_is_unprocessed() {
        assert_eq!(
            pipeline().process("WBC 999999999").unwrap(),
            PipelineOutcome::Unprocessed {
                reason: NOTHING_NORMALIZED_REASON.to_string()
            }
        );
    }

    #[test]
    fn scenario_no_digits_is_error() {
        assert_eq!(
            pipeline().process("Patient feels fine today"),
            Err(PipelineError::NoTestLines)
        );
    }

    #[test]
    fn empty_text_is_error() {
        assert_eq!(pipeline().process(""), Err(PipelineError::NoTestLines));
        assert_eq!(pipeline().process("   \n  "), Err(PipelineError::NoTestLines));
    }

    #[test]
    fn all_normal_report() {
        let output = completed(pipeline().process("Glucose 85 mg/dL\nPlatelets 250").unwrap());
        assert_eq!(
            output.summary(),
            "All test results appear to be within the normal range."
        );
        assert!(output.explanations().is_empty());
    }

    #[test]
    fn guardrail_trip_is_unprocessed() {
        let templates = ExplanationTemplates::empty().with_template(
            "Hemoglobin",
            TestStatus::Low,
            "Low hemoglobin can also lower your glucose.",
        );
        let pipeline = pipeline().with_templates(Arc::new(templates));
        match pipeline.process("Hemoglobin 10.5\nGlucose 85").unwrap() {
            PipelineOutcome::Unprocessed { reason } => assert!(reason.contains("Glucose")),
            other => panic!("expected unprocessed, got {other:?}"),
        }
    }

    #[test]
    fn stricter_threshold_rejects_typos() {
        let config = PipelineConfig::default().with_match_threshold(95.0).unwrap();
        let pipeline = ReportPipeline::builtin(config).unwrap();
        assert!(matches!(
            pipeline.process("Hemglobin: 10.5").unwrap(),
            PipelineOutcome::Unprocessed { .. }
        ));
    }

    #[test]
    fn error_message_wording() {
        assert_eq!(
            PipelineError::NoTestLines.to_string(),
            "No valid test lines found in the input."
        );
    }

    #[test]
    fn completed_serializes_with_ok_status() {
        let outcome = pipeline().process("Hemoglobin 10.5 g/dL").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["tests"][0]["name"], "Hemoglobin");
        assert_eq!(json["tests"][0]["status"], "low");
        assert_eq!(json["summary"], "Your results show low hemoglobin.");
        assert!(json["explanations"].is_array());
    }

    #[test]
    fn unprocessed_serializes_with_reason() {
        let outcome = pipeline().process("WBC 999999999").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "unprocessed");
        assert_eq!(json["reason"], NOTHING_NORMALIZED_REASON);
    }

    /// Sends every line to one fixed entry.
    struct PinnedScorer(&'static str);

    impl SimilarityScorer for PinnedScorer {
        fn score(&self, _query: &str, choice: &str) -> f64 {
            if choice == self.0 {
                100.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn injected_scorer_drives_name_matching() {
        let pipeline = pipeline().with_scorer(Box::new(PinnedScorer("Glucose")));
        let output = completed(pipeline.process("Hemoglobin 85").unwrap());

        assert_eq!(output.tests().len(), 1);
        assert_eq!(output.tests()[0].name, "Glucose");
        assert_eq!(output.tests()[0].unit, "mg/dL");
        assert_eq!(output.tests()[0].status, TestStatus::Normal);
    }

    #[test]
    fn injected_scorer_below_threshold_is_unprocessed() {
        let pipeline = pipeline().with_scorer(Box::new(PinnedScorer("Not In Table")));
        assert_eq!(
            pipeline.process("Hemoglobin 10.5 g/dL").unwrap(),
            PipelineOutcome::Unprocessed {
                reason: NOTHING_NORMALIZED_REASON.to_string()
            }
        );
    }
}
