use std::collections::HashMap;

use crate::models::TestStatus;

/// Built-in explanations. Each mentions no canonical test name other than its own.
const BUILTIN_TEMPLATES: &[(&str, TestStatus, &str)] = &[
    (
        "Hemoglobin",
        TestStatus::Low,
        "Low hemoglobin might be related to a condition called anemia, where your body has \
         fewer red blood cells than normal. This can cause feelings of tiredness or weakness.",
    ),
    (
        "Hemoglobin",
        TestStatus::High,
        "High hemoglobin can happen with dehydration, smoking, or living at high altitude.",
    ),
    (
        "WBC",
        TestStatus::High,
        "High white blood cells can be a sign that your body is fighting an infection.",
    ),
    (
        "White Blood Cell Count",
        TestStatus::High,
        "High white blood cells can be a sign that your body is fighting an infection.",
    ),
    (
        "WBC",
        TestStatus::Low,
        "Low white blood cells can make it harder for your body to fight off infections.",
    ),
    (
        "White Blood Cell Count",
        TestStatus::Low,
        "Low white blood cells can make it harder for your body to fight off infections.",
    ),
    (
        "Platelets",
        TestStatus::Low,
        "Low platelets can make it easier to bruise or bleed, because platelets help your blood clot.",
    ),
    (
        "Platelets",
        TestStatus::High,
        "High platelets can sometimes follow an infection, inflammation, or low iron levels.",
    ),
    (
        "Glucose",
        TestStatus::Low,
        "Low glucose means your blood sugar is lower than usual, which can cause shakiness, \
         sweating, or dizziness.",
    ),
    (
        "Glucose",
        TestStatus::High,
        "High glucose means there is more sugar in your blood than usual. This can happen after \
         a meal, or it may be something your doctor wants to look into further.",
    ),
];

/// Explanation table keyed by (canonical name, status).
///
/// Lookups are exact on the canonical name. Add coverage by inserting entries.
#[derive(Debug, Clone, Default)]
pub struct ExplanationTemplates {
    entries: HashMap<(String, TestStatus), String>,
}

impl ExplanationTemplates {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        BUILTIN_TEMPLATES
            .iter()
            .fold(Self::empty(), |table, &(name, status, text)| {
                table.with_template(name, status, text)
            })
    }

    /// Add or replace a template.
    pub fn with_template(mut self, name: &str, status: TestStatus, text: &str) -> Self {
        self.entries
            .insert((name.to_string(), status), text.to_string());
        self
    }

    pub fn lookup(&self, name: &str, status: TestStatus) -> Option<&str> {
        self.entries
            .get(&(name.to_string(), status))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;

    #[test]
    fn builtin_covers_hemoglobin_low() {
        let templates = ExplanationTemplates::builtin();
        let text = templates.lookup("Hemoglobin", TestStatus::Low).unwrap();
        assert!(text.contains("anemia"));
    }

    #[test]
    fn lookup_is_keyed_by_status() {
        let templates = ExplanationTemplates::builtin();
        assert_ne!(
            templates.lookup("WBC", TestStatus::High),
            templates.lookup("WBC", TestStatus::Low)
        );
        assert!(templates.lookup("WBC", TestStatus::Normal).is_none());
    }

    #[test]
    fn lookup_is_exact_on_name() {
        let templates = ExplanationTemplates::builtin();
        assert!(templates.lookup("hemoglobin", TestStatus::Low).is_none());
        assert!(templates.lookup("Sodium", TestStatus::Low).is_none());
    }

    #[test]
    fn with_template_replaces_existing() {
        let templates = ExplanationTemplates::builtin()
            .with_template("Glucose", TestStatus::High, "Replaced.");
        assert_eq!(templates.lookup("Glucose", TestStatus::High), Some("Replaced."));
        assert_eq!(templates.len(), BUILTIN_TEMPLATES.len());
    }

    #[test]
    fn empty_has_no_entries() {
        assert!(ExplanationTemplates::empty().is_empty());
    }

    #[test]
    fn builtin_templates_only_mention_their_own_test() {
        let kb = KnowledgeBase::builtin().unwrap();
        for &(owner, _, text) in BUILTIN_TEMPLATES {
            let lower = text.to_lowercase();
            for name in kb.names() {
                if name != owner {
                    assert!(
                        !lower.contains(&name.to_lowercase()),
                        "template for {owner} mentions {name}"
                    );
                }
            }
        }
    }
}
