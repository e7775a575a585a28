use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::KnowledgeBaseError;
use crate::models::{PhysiologicalLimits, ReferenceRange};

/// Bundled table of supported tests.
const BUILTIN_TESTS_JSON: &str = include_str!("../../resources/known_tests.json");

/// One supported lab test, keyed by its canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownTest {
    pub name: String,
    pub unit: String,
    pub ref_range: ReferenceRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physiological_limits: Option<PhysiologicalLimits>,
}

/// Read-only lookup table of known tests.
///
/// Built once at startup and shared behind an `Arc`. Iteration order is the
/// order entries were supplied, which the name matcher relies on for tie-breaks.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    tests: Vec<KnownTest>,
    by_name: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Validate entries and build the table.
    pub fn new(tests: Vec<KnownTest>) -> Result<Self, KnowledgeBaseError> {
        if tests.is_empty() {
            return Err(KnowledgeBaseError::Empty);
        }

        let mut by_name = HashMap::with_capacity(tests.len());
        let mut lowered = HashMap::with_capacity(tests.len());

        for (idx, test) in tests.iter().enumerate() {
            validate_entry(test)?;

            if lowered.insert(test.name.to_lowercase(), idx).is_some() {
                return Err(KnowledgeBaseError::DuplicateName(test.name.clone()));
            }
            by_name.insert(test.name.clone(), idx);
        }

        Ok(Self { tests, by_name })
    }

    /// Parse a JSON array of `KnownTest`.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeBaseError> {
        let tests: Vec<KnownTest> = serde_json::from_str(json)?;
        Self::new(tests)
    }

    /// Load a knowledge base file from disk.
    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| KnowledgeBaseError::Load(path.display().to_string(), e.to_string()))?;
        let kb = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), tests = kb.len(), "Knowledge base loaded");
        Ok(kb)
    }

    /// The bundled default table.
    pub fn builtin() -> Result<Self, KnowledgeBaseError> {
        Self::from_json(BUILTIN_TESTS_JSON)
    }

    /// Exact canonical-name lookup.
    pub fn get(&self, name: &str) -> Option<&KnownTest> {
        self.by_name.get(name).map(|&idx| &self.tests[idx])
    }

    pub fn tests(&self) -> &[KnownTest] {
        &self.tests
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

fn validate_entry(test: &KnownTest) -> Result<(), KnowledgeBaseError> {
    if test.name.trim().is_empty() {
        return Err(KnowledgeBaseError::InvalidEntry {
            name: test.name.clone(),
            reason: "name is empty".into(),
        });
    }

    let range = &test.ref_range;
    if !range.low.is_finite() || !range.high.is_finite() || range.low > range.high {
        return Err(KnowledgeBaseError::InvalidEntry {
            name: test.name.clone(),
            reason: format!("reference range [{}, {}] is not ordered", range.low, range.high),
        });
    }

    if let Some(limits) = &test.physiological_limits {
        if !limits.min.is_finite() || !limits.max.is_finite() || limits.min > limits.max {
            return Err(KnowledgeBaseError::InvalidEntry {
                name: test.name.clone(),
                reason: format!(
                    "physiological limits [{}, {}] are not ordered",
                    limits.min, limits.max
                ),
            });
        }
    }

    Ok(())
}
