use std::collections::HashSet;

use crate::knowledge::KnowledgeBase;
use crate::models::NormalizedTest;

/// Find the first knowledge base name that the explanations mention but that
/// is not one of the abnormal results.
///
/// Matching is a case-insensitive substring scan over the joined explanations,
/// so a template for "WBC" that talks about "glucose" is caught even when the
/// glucose result was normal. Names are checked in knowledge base order.
pub fn find_unattributed_mention<'kb>(
    explanations: &[String],
    abnormal: &[&NormalizedTest],
    kb: &'kb KnowledgeBase,
) -> Option<&'kb str> {
    if explanations.is_empty() {
        return None;
    }

    let flagged: HashSet<String> = abnormal.iter().map(|t| t.name.to_lowercase()).collect();
    let text = explanations.join(" ").to_lowercase();

    kb.names().find(|name| {
        let lower = name.to_lowercase();
        text.contains(&lower) && !flagged.contains(&lower)
    })
}

/// Reason reported when the guardrail blocks a summary.
pub fn hallucination_reason(name: &str) -> String {
    format!(
        "Potential hallucination detected: explanation mentions '{name}' which was not an abnormal result."
    )
}
