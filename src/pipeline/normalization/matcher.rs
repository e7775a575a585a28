use super::scorer::SimilarityScorer;
use crate::knowledge::{KnownTest, KnowledgeBase};

/// Best knowledge base entry for a line, with its similarity score.
#[derive(Debug, Clone, Copy)]
pub struct NameMatch<'kb> {
    pub test: &'kb KnownTest,
    pub score: f64,
}

/// Resolves free-text report lines to canonical test names.
pub struct NameMatcher<'a> {
    kb: &'a KnowledgeBase,
    scorer: &'a dyn SimilarityScorer,
    threshold: f64,
}

impl<'a> NameMatcher<'a> {
    pub fn new(kb: &'a KnowledgeBase, scorer: &'a dyn SimilarityScorer, threshold: f64) -> Self {
        Self {
            kb,
            scorer,
            threshold,
        }
    }

    /// Highest-scoring entry regardless of threshold.
    ///
    /// Ties keep the earliest entry in knowledge base order.
    pub fn best_candidate(&self, line: &str) -> Option<NameMatch<'a>> {
        let mut best: Option<NameMatch<'a>> = None;
        for test in self.kb.tests() {
            let score = self.scorer.score(line, &test.name);
            if best.map_or(true, |b| score > b.score) {
                best = Some(NameMatch { test, score });
            }
        }
        best
    }

    /// Best entry if it reaches the acceptance threshold.
    ///
    /// `Err` carries the best score seen (0 for an empty table) for diagnostics.
    pub fn match_line(&self, line: &str) -> Result<NameMatch<'a>, f64> {
        match self.best_candidate(line) {
            Some(m) if m.score >= self.threshold => Ok(m),
            Some(m) => Err(m.score),
            None => Err(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReferenceRange;
    use crate::pipeline::normalization::scorer::WeightedRatio;

    /// 100 on case-sensitive containment, else 0.
    struct ContainsScorer;

    impl SimilarityScorer for ContainsScorer {
        fn score(&self, query: &str, choice: &str) -> f64 {
            if query.contains(choice) {
                100.0
            } else {
                0.0
            }
        }
    }

    /// Scores everything the same so tie-breaking is observable.
    struct FlatScorer;

    impl SimilarityScorer for FlatScorer {
        fn score(&self, _query: &str, _choice: &str) -> f64 {
            80.0
        }
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().unwrap()
    }

    #[test]
    fn resolves_exact_name() {
        let kb = kb();
        let matcher = NameMatcher::new(&kb, &WeightedRatio, 70.0);
        let m = matcher.match_line("Hemoglobin 10.5 g/dL").unwrap();
        assert_eq!(m.test.name, "Hemoglobin");
    }

    #[test]
    fn resolves_abbreviation_over_long_name() {
        let kb = kb();
        let matcher = NameMatcher::new(&kb, &WeightedRatio, 70.0);
        let m = matcher.match_line("WBC 7500 /uL").unwrap();
        assert_eq!(m.test.name, "WBC");
    }

    #[test]
    fn resolves_typo() {
        let kb = kb();
        let matcher = NameMatcher::new(&kb, &WeightedRatio, 70.0);
        let m = matcher.match_line("Hemglobin: 10.5").unwrap();
        assert_eq!(m.test.name, "Hemoglobin");
        assert!(m.score >= 70.0);
    }

    #[test]
    fn resolves_long_name() {
        let kb = kb();
        let matcher = NameMatcher::new(&kb, &WeightedRatio, 70.0);
        let m = matcher.match_line("White Blood Cell Count: 12,500").unwrap();
        assert_eq!(m.test.name, "White Blood Cell Count");
    }

    #[test]
    fn unrelated_line_below_threshold() {
        let kb = kb();
        let matcher = NameMatcher::new(&kb, &WeightedRatio, 70.0);
        let best = matcher.match_line("Date 2024 03 15").unwrap_err();
        assert!(best < 70.0);
    }

    #[test]
    fn threshold_is_configurable() {
        let kb = kb();
        let strict = NameMatcher::new(&kb, &WeightedRatio, 99.0);
        assert!(strict.match_line("Hemglobin: 10.5").is_err());

        let lax = NameMatcher::new(&kb, &WeightedRatio, 0.0);
        assert!(lax.match_line("Date 2024 03 15").is_ok());
    }

    #[test]
    fn ties_prefer_first_entry() {
        let kb = kb();
        let matcher = NameMatcher::new(&kb, &FlatScorer, 70.0);
        let m = matcher.match_line("anything 1").unwrap();
        assert_eq!(m.test.name, "Hemoglobin");
    }

    #[test]
    fn scorer_is_swappable() {
        let kb = KnowledgeBase::new(vec![KnownTest {
            name: "Ferritin".into(),
            unit: "ng/mL".into(),
            ref_range: ReferenceRange { low: 15.0, high: 150.0 },
            physiological_limits: None,
        }])
        .unwrap();
        let matcher = NameMatcher::new(&kb, &ContainsScorer, 70.0);
        assert!(matcher.match_line("Ferritin 40").is_ok());
        assert!(matcher.match_line("ferritin 40").is_err());
    }
}
