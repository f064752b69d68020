// crates/gov-dq/src/scoring.rs
// ============================================================================
// Module: CDE Scoring
// Description: Deterministic criticality scoring over data-element factors.
// ============================================================================

//! ## Overview
//! `score_elements` is a pure function: no randomness, no learned
//! component, no hidden state. Identical factors and weights always produce
//! a bit-identical overall score, which property tests below exercise.

use gov_core::domain::cde::CdeFactors;
use gov_core::domain::cde::CdeScore;
use gov_core::domain::cde::CdeWeights;
use gov_core::domain::cde::compute_overall_score;
use gov_core::identifiers::CdeId;

/// One data element submitted for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringInput {
    /// Identifier to assign the resulting score.
    pub id: CdeId,
    /// Human-readable element name.
    pub name: String,
    /// Raw scoring factors.
    pub factors: CdeFactors,
}

/// Scores every element in `inputs`, applying `weights` (default: uniform
/// `0.25` across all four factors) to each element's factors.
#[must_use]
pub fn score_elements(inputs: &[ScoringInput], weights: Option<CdeWeights>) -> Vec<CdeScore> {
    let weights = weights.unwrap_or_default();
    inputs
        .iter()
        .map(|input| CdeScore {
            id: input.id.clone(),
            name: input.name.clone(),
            factors: input.factors,
            overall: compute_overall_score(&input.factors, &weights),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ScoringInput;
    use super::score_elements;
    use gov_core::domain::cde::CdeFactors;
    use gov_core::identifiers::CdeId;
    use proptest::prelude::*;

    fn input(name: &str, factors: CdeFactors) -> ScoringInput {
        ScoringInput {
            id: CdeId::new(name),
            name: name.to_string(),
            factors,
        }
    }

    #[test]
    fn identical_factors_yield_identical_scores_across_elements() {
        let factors = CdeFactors {
            regulatory_sensitivity: 0.8,
            business_impact: 0.6,
            usage_breadth: 0.9,
            quality_risk: 0.7,
        };
        let scores = score_elements(&[input("a", factors), input("b", factors)], None);
        assert_eq!(scores[0].overall.to_bits(), scores[1].overall.to_bits());
        assert!((scores[0].overall - 0.75).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn overall_stays_within_unit_interval(
            r in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
            u in 0.0f64..=1.0,
            q in 0.0f64..=1.0,
        ) {
            let factors = CdeFactors {
                regulatory_sensitivity: r,
                business_impact: b,
                usage_breadth: u,
                quality_risk: q,
            };
            let scores = score_elements(&[input("x", factors)], None);
            prop_assert!(scores[0].overall >= 0.0 - 1e-9);
            prop_assert!(scores[0].overall <= 1.0 + 1e-9);
        }

        #[test]
        fn scoring_is_deterministic(
            r in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
            u in 0.0f64..=1.0,
            q in 0.0f64..=1.0,
        ) {
            let factors = CdeFactors {
                regulatory_sensitivity: r,
                business_impact: b,
                usage_breadth: u,
                quality_risk: q,
            };
            let first = score_elements(&[input("x", factors)], None);
            let second = score_elements(&[input("x", factors)], None);
            prop_assert_eq!(first[0].overall.to_bits(), second[0].overall.to_bits());
        }
    }
}
