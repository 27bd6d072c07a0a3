//! Rhyme Scorer (SPEC_FULL.md §4.F): combines per-position component
//! probabilities, or a single n-gram probability, into one pair score.

use crate::ipa::same_parity;
use crate::keys::PairKey;
use crate::probability::ProbabilityTables;

const FALLBACK_MATCH: f64 = 0.99;
const FALLBACK_MISMATCH: f64 = 0.0001;

fn length_coef(length_penalty: f64, l1: f32, l2: f32) -> f64 {
    if same_parity(l1, l2) {
        1.0
    } else {
        1.0 - length_penalty
    }
}

/// Score a pair of fingerprints against the trained per-position component
/// probabilities.
pub fn component_score(
    c1: &[String],
    c2: &[String],
    l1: f32,
    l2: f32,
    probabilities: &ProbabilityTables,
    length_penalty: f64,
) -> f64 {
    let m = c1.len().min(c2.len());
    let coef = length_coef(length_penalty, l1, l2);

    if c1[..m] == c2[..m] {
        return coef;
    }

    let mut num = 1.0_f64;
    let mut denom_extra = 1.0_f64;
    for i in 0..m {
        let key = PairKey::new(c1[i].clone(), c2[i].clone());
        let p = probabilities
            .p_c
            .get(i)
            .and_then(|table| table.get(&key))
            .copied()
            .unwrap_or_else(|| {
                if c1[i] == c2[i] {
                    FALLBACK_MATCH
                } else {
                    FALLBACK_MISMATCH
                }
            });
        num *= p;
        denom_extra *= 1.0 - p;
    }

    if num + denom_extra > 0.0 {
        coef * (num / (num + denom_extra))
    } else {
        0.0
    }
}

/// Score a pair of final n-grams against the trained n-gram probabilities.
pub fn ngram_score(
    g1: &str,
    g2: &str,
    l1: f32,
    l2: f32,
    probabilities: &ProbabilityTables,
    length_penalty: f64,
) -> f64 {
    let coef = length_coef(length_penalty, l1, l2);
    let key = PairKey::new(g1.to_string(), g2.to_string());
    let p = probabilities.p_g.get(&key).copied().unwrap_or_else(|| {
        if g1 == g2 {
            FALLBACK_MATCH
        } else {
            FALLBACK_MISMATCH
        }
    });
    coef * p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_components_score_one_with_matching_parity() {
        let probs = ProbabilityTables::default();
        let score = component_score(
            &["t".into(), "æ".into(), "k".into()],
            &["t".into(), "æ".into(), "k".into()],
            1.5,
            1.5,
            &probs,
            0.5,
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn identical_components_with_parity_mismatch_are_penalized() {
        let probs = ProbabilityTables::default();
        let score = component_score(
            &["t".into(), "æ".into()],
            &["t".into(), "æ".into()],
            1.0,
            2.0,
            &probs,
            0.5,
        );
        assert_eq!(score, 0.5);
    }

    #[test]
    fn fallback_probabilities_favor_matches_over_mismatches() {
        let probs = ProbabilityTables::default();
        let matching = component_score(
            &["t".into(), "æ".into()],
            &["s".into(), "æ".into()],
            1.0,
            1.0,
            &probs,
            0.0,
        );
        let mismatching = component_score(
            &["t".into(), "i".into()],
            &["s".into(), "u".into()],
            1.0,
            1.0,
            &probs,
            0.0,
        );
        assert!(matching > mismatching);
    }

    #[test]
    fn both_fingerprints_empty_scores_one_with_matching_parity() {
        // m == 0: the truncated slices are trivially equal ([] == []), so
        // this must short-circuit to `1 * length_coef` rather than fall
        // through to the per-component loop, which would spuriously yield
        // 0.5 from the num/denom_extra = 1/1 identity on an empty product.
        let probs = ProbabilityTables::default();
        let score = component_score(&[], &[], 1.0, 1.0, &probs, 0.5);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn ngram_score_uses_fallback_for_unknown_pair() {
        let probs = ProbabilityTables::default();
        let same = ngram_score("ing", "ing", 1.0, 1.0, &probs, 0.0);
        let different = ngram_score("ing", "oat", 1.0, 1.0, &probs, 0.0);
        assert!(same > different);
    }
}
