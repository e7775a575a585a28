//! String similarity scoring for OCR-tolerant test name matching.
//!
//! `WeightedRatio` combines an indel (insert/delete edit distance) ratio with
//! partial-window, token-sort and token-set variants, weighting the latter down
//! as the two strings' lengths diverge. Scores are in [0, 100].

use std::collections::BTreeSet;

/// Down-weight applied to token-based variants.
const TOKEN_SCALE: f64 = 0.95;

/// Partial matching is only considered once the longer string is this many
/// times the length of the shorter one.
const PARTIAL_MIN_LENGTH_RATIO: f64 = 1.5;

/// Beyond this length ratio, partial matches are trusted much less.
const PARTIAL_LONG_LENGTH_RATIO: f64 = 8.0;

/// Similarity between a free-text query and a candidate name.
pub trait SimilarityScorer {
    /// Score in [0, 100]. Identical strings score 100.
    fn score(&self, query: &str, choice: &str) -> f64;
}

/// Weighted combination of edit-distance and token-overlap ratios.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl SimilarityScorer for WeightedRatio {
    fn score(&self, query: &str, choice: &str) -> f64 {
        let a = preprocess(query);
        let b = preprocess(choice);
        weighted_ratio(&a, &b)
    }
}

/// Lowercase, replace non-alphanumerics with spaces, collapse whitespace.
pub fn preprocess(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn weighted_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars.len(), b_chars.len())
    } else {
        (b_chars.len(), a_chars.len())
    };
    let length_ratio = longer as f64 / shorter as f64;

    let base = ratio(&a_chars, &b_chars);

    if length_ratio < PARTIAL_MIN_LENGTH_RATIO {
        let token = token_sort_ratio(a, b).max(token_set_ratio(a, b)) * TOKEN_SCALE;
        return base.max(token);
    }

    let partial_scale = if length_ratio < PARTIAL_LONG_LENGTH_RATIO { 0.9 } else { 0.6 };
    let partial = partial_ratio(&a_chars, &b_chars) * partial_scale;
    let partial_token = partial_token_sort_ratio(a, b).max(partial_token_set_ratio(a, b))
        * TOKEN_SCALE
        * partial_scale;

    base.max(partial).max(partial_token)
}

/// Indel similarity: `200 * lcs / (len_a + len_b)`.
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn ratio_str(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    ratio(&a_chars, &b_chars)
}

/// Longest common subsequence length, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &a_ch in a {
        for (j, &b_ch) in b.iter().enumerate() {
            curr[j + 1] = if a_ch == b_ch {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Best ratio of the shorter string against every same-length window of the longer.
fn partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        best = best.max(ratio(short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn partial_ratio_str(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    partial_ratio(&a_chars, &b_chars)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio_str(&sorted_tokens(a), &sorted_tokens(b))
}

fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio_str(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token sets split into (intersection, only-in-a, only-in-b), each sorted.
struct TokenSplit<'a> {
    common: Vec<&'a str>,
    only_a: Vec<&'a str>,
    only_b: Vec<&'a str>,
}

fn split_tokens<'a>(a: &'a str, b: &'a str) -> TokenSplit<'a> {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    TokenSplit {
        common: set_a.intersection(&set_b).copied().collect(),
        only_a: set_a.difference(&set_b).copied().collect(),
        only_b: set_b.difference(&set_a).copied().collect(),
    }
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let split = split_tokens(a, b);
    if !split.common.is_empty() && (split.only_a.is_empty() || split.only_b.is_empty()) {
        return 100.0;
    }

    let common = split.common.join(" ");
    let combined_a = with_common(&common, &split.only_a);
    let combined_b = with_common(&common, &split.only_b);

    let mut best = ratio_str(&combined_a, &combined_b);
    if !common.is_empty() {
        best = best
            .max(ratio_str(&common, &combined_a))
            .max(ratio_str(&common, &combined_b));
    }
    best
}

fn with_common(common: &str, rest: &[&str]) -> String {
    if common.is_empty() {
        rest.join(" ")
    } else {
        format!("{common} {}", rest.join(" "))
    }
}

fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    let split = split_tokens(a, b);
    if !split.common.is_empty() {
        return 100.0;
    }
    partial_ratio_str(&split.only_a.join(" "), &split.only_b.join(" "))
}
