/// Token-set fuzzy similarity.
///
/// Both strings are treated as sets of word tokens: order and repetition are
/// ignored. The score is the best normalized edit-distance agreement between
/// the sorted token intersection and each side's intersection-plus-remainder,
/// so a string whose tokens are a subset of the other's scores exactly 1.0,
/// while near-miss spellings ("sign" vs "signs") still score high through the
/// character-level comparison.
use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Similarity between two texts in [0.0, 1.0]. Symmetric and deterministic;
/// case differences are folded away here rather than assumed handled upstream.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a = word_set(a);
    let set_b = word_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let common: Vec<&str> = set_a.intersection(&set_b).map(String::as_str).collect();
    if !common.is_empty() && (common.len() == set_a.len() || common.len() == set_b.len()) {
        return 1.0;
    }

    let only_a: Vec<&str> = set_a.difference(&set_b).map(String::as_str).collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).map(String::as_str).collect();

    let sect = common.join(" ");
    let sect_plus_a = append_words(&sect, &only_a);
    let sect_plus_b = append_words(&sect, &only_b);

    let sect_vs_a = normalized_levenshtein(&sect, &sect_plus_a);
    let sect_vs_b = normalized_levenshtein(&sect, &sect_plus_b);
    let a_vs_b = normalized_levenshtein(&sect_plus_a, &sect_plus_b);

    sect_vs_a.max(sect_vs_b).max(a_vs_b)
}

/// Lower-cased word-token set. BTreeSet iteration is sorted, which keeps the
/// joined comparison strings deterministic.
fn word_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn append_words(sect: &str, rest: &[&str]) -> String {
    if sect.is_empty() {
        rest.join(" ")
    } else if rest.is_empty() {
        sect.to_string()
    } else {
        format!("{sect} {}", rest.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(token_set_ratio("blind curve", "blind curve"), 1.0);
    }

    #[test]
    fn word_order_is_ignored() {
        assert_eq!(token_set_ratio("curve blind", "blind curve"), 1.0);
    }

    #[test]
    fn subset_scores_one() {
        assert_eq!(token_set_ratio("curve", "blind curve"), 1.0);
        assert_eq!(token_set_ratio("blind curve ahead", "curve"), 1.0);
    }

    #[test]
    fn case_is_folded() {
        assert_eq!(token_set_ratio("Blind Curve", "blind CURVE"), 1.0);
    }

    #[test]
    fn disjoint_short_strings_score_low() {
        let score = token_set_ratio("guardrail", "zebra");
        assert!(score < 0.4, "expected low score, got {score}");
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(token_set_ratio("", "blind curve"), 0.0);
        assert_eq!(token_set_ratio("curve", "   "), 0.0);
        assert_eq!(token_set_ratio("", ""), 0.0);
    }

    #[test]
    fn near_miss_spelling_scores_high() {
        let score = token_set_ratio("chevron signs", "chevron sign");
        assert!(score > 0.8, "expected high score, got {score}");
        assert!(score < 1.0);
    }

    #[test]
    fn symmetric() {
        let ab = token_set_ratio("faded zebra crossing", "zebra crossing worn");
        let ba = token_set_ratio("zebra crossing worn", "faded zebra crossing");
        assert_eq!(ab, ba);
    }

    #[test]
    fn deterministic() {
        let first = token_set_ratio("street light outage", "streetlight not working");
        let second = token_set_ratio("street light outage", "streetlight not working");
        assert_eq!(first, second);
    }

    #[test]
    fn bounded() {
        for (a, b) in [
            ("pothole", "potholes on carriageway"),
            ("night visibility", "dark stretch"),
            ("x", "yyyyyyyyyy"),
        ] {
            let score = token_set_ratio(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} vs {b} gave {score}");
        }
    }
}
