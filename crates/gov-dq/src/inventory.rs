// crates/gov-dq/src/inventory.rs
// ============================================================================
// Module: CDE Inventory
// Description: Threshold-gated inclusion of scored elements into the
//              critical data element inventory.
// ============================================================================

//! ## Overview
//! `generate_cde_inventory` includes exactly the scores with `overall >=
//! threshold`: no score below threshold is admitted, and every admitted
//! score carries a non-empty rationale.

use gov_core::domain::cde::CdeInventory;
use gov_core::domain::cde::CdeScore;
use gov_core::domain::cde::CriticalDataElement;

/// Builds the criticality rationale attached to an admitted element.
fn default_rationale(score: &CdeScore, threshold: f64) -> String {
    format!(
        "overall criticality score {:.3} meets or exceeds the configured threshold {:.3}",
        score.overall, threshold
    )
}

/// Builds a [`CdeInventory`] over `scores`, admitting exactly the elements
/// with `overall >= threshold`. When `include_rationale` is `false` the
/// rationale field is still populated (it may never be empty, §3) but with a
/// terse placeholder instead of the scored explanation.
#[must_use]
pub fn generate_cde_inventory(scores: &[CdeScore], threshold: f64, include_rationale: bool) -> CdeInventory {
    let elements = scores
        .iter()
        .filter(|score| score.overall >= threshold)
        .map(|score| {
            let rationale = if include_rationale {
                default_rationale(score, threshold)
            } else {
                "admitted by threshold rule".to_string()
            };
            CriticalDataElement {
                score: score.clone(),
                criticality_rationale: rationale,
            }
        })
        .collect();

    CdeInventory { threshold, elements }
}

#[cfg(test)]
mod tests {
    use super::generate_cde_inventory;
    use gov_core::domain::cde::CdeFactors;
    use gov_core::domain::cde::CdeScore;
    use gov_core::identifiers::CdeId;

    fn score(name: &str, overall: f64) -> CdeScore {
        CdeScore {
            id: CdeId::new(name),
            name: name.to_string(),
            factors: CdeFactors {
                regulatory_sensitivity: overall,
                business_impact: overall,
                usage_breadth: overall,
                quality_risk: overall,
            },
            overall,
        }
    }

    #[test]
    fn inclusion_is_threshold_exact_with_non_empty_rationale() {
        let scores = vec![score("below", 0.4), score("at", 0.5), score("above", 0.9)];
        let inventory = generate_cde_inventory(&scores, 0.5, true);
        let ids: Vec<&str> = inventory.elements.iter().map(|e| e.score.id.as_str()).collect();
        assert_eq!(ids, vec!["at", "above"]);
        for element in &inventory.elements {
            assert!(!element.criticality_rationale.is_empty());
        }
    }

    #[test]
    fn excluded_elements_never_appear() {
        let scores = vec![score("low", 0.1)];
        let inventory = generate_cde_inventory(&scores, 0.5, true);
        assert!(inventory.elements.is_empty());
    }
}
