// crates/gov-core/src/domain/cde.rs
// ============================================================================
// Module: Critical Data Elements
// Description: Scoring factors, deterministic overall score, and the
//              threshold-gated inventory of critical data elements.
// ============================================================================

//! ## Overview
//! A data element's criticality is a weighted sum of four factors, each in
//! `[0, 1]`. Weights sum to `1` so the overall score is also in `[0, 1]`.
//! Scoring is a pure function: identical
//! factors and weights always produce a bit-identical overall score.

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::CdeId;

/// The four scoring factors considered for data-element criticality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdeFactors {
    /// Regulatory sensitivity of the element, in `[0, 1]`.
    pub regulatory_sensitivity: f64,
    /// Business impact if the element is wrong or missing, in `[0, 1]`.
    pub business_impact: f64,
    /// How many downstream reports/processes depend on it, in `[0, 1]`.
    pub usage_breadth: f64,
    /// Historical data-quality incident rate for the element, in `[0, 1]`.
    pub quality_risk: f64,
}

/// Weights applied to [`CdeFactors`] when computing an overall score.
///
/// # Invariants
/// - The four weights sum to `1.0` (checked by [`CdeWeights::is_normalized`],
///   not enforced at construction since callers may intentionally supply a
///   non-normalized set and inspect the result).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdeWeights {
    /// Weight applied to [`CdeFactors::regulatory_sensitivity`].
    pub regulatory_sensitivity: f64,
    /// Weight applied to [`CdeFactors::business_impact`].
    pub business_impact: f64,
    /// Weight applied to [`CdeFactors::usage_breadth`].
    pub usage_breadth: f64,
    /// Weight applied to [`CdeFactors::quality_risk`].
    pub quality_risk: f64,
}

impl CdeWeights {
    /// The default uniform weighting: `0.25` across all four factors.
    #[must_use]
    pub const fn uniform() -> Self {
        Self {
            regulatory_sensitivity: 0.25,
            business_impact: 0.25,
            usage_breadth: 0.25,
            quality_risk: 0.25,
        }
    }

    /// Returns `true` if the weights sum to `1.0` within floating-point tolerance.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        let sum = self.regulatory_sensitivity + self.business_impact + self.usage_breadth + self.quality_risk;
        (sum - 1.0).abs() < 1e-9
    }
}

impl Default for CdeWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// A scored data element, identified and carrying its deterministic overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdeScore {
    /// Identifier of the scored element.
    pub id: CdeId,
    /// Human-readable element name.
    pub name: String,
    /// Raw scoring factors.
    pub factors: CdeFactors,
    /// Weighted overall score, `Σ factor_i · weight_i`.
    pub overall: f64,
}

/// Computes the deterministic overall score for `factors` under `weights`.
///
/// Pure and order-stable: the same inputs always produce the same `f64` bit
/// pattern, since this is a fixed sequence of multiply-adds with no
/// data-dependent branching.
#[must_use]
pub fn compute_overall_score(factors: &CdeFactors, weights: &CdeWeights) -> f64 {
    factors.regulatory_sensitivity * weights.regulatory_sensitivity
        + factors.business_impact * weights.business_impact
        + factors.usage_breadth * weights.usage_breadth
        + factors.quality_risk * weights.quality_risk
}

/// A critical data element admitted to the inventory.
///
/// # Invariants
/// - Only constructed for scores with `overall >= threshold`.
/// - `criticality_rationale` is always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalDataElement {
    /// The underlying score this entry was admitted from.
    pub score: CdeScore,
    /// Non-empty explanation for why this element was deemed critical.
    pub criticality_rationale: String,
}

/// The threshold-gated inventory of critical data elements (§4.F).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdeInventory {
    /// Threshold used to build this inventory.
    pub threshold: f64,
    /// Elements admitted because `overall >= threshold`.
    pub elements: Vec<CriticalDataElement>,
}

#[cfg(test)]
mod tests {
    use super::CdeFactors;
    use super::CdeWeights;
    use super::compute_overall_score;

    #[test]
    fn identical_inputs_produce_identical_scores() {
        let factors = CdeFactors {
            regulatory_sensitivity: 0.8,
            business_impact: 0.6,
            usage_breadth: 0.9,
            quality_risk: 0.7,
        };
        let weights = CdeWeights::uniform();
        let first = compute_overall_score(&factors, &weights);
        let second = compute_overall_score(&factors, &weights);
        assert_eq!(first.to_bits(), second.to_bits());
        assert!((first - 0.75).abs() < 1e-12);
    }

    #[test]
    fn uniform_weights_are_normalized() {
        assert!(CdeWeights::uniform().is_normalized());
    }
}
