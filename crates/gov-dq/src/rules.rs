// crates/gov-dq/src/rules.rs
// ============================================================================
// Module: DQ Rule Generation
// Description: Generates one enabled data-quality rule per requested
//              dimension against a single CDE.
// ============================================================================

//! ## Overview
//! `generate_dq_rules` produces exactly one enabled rule per requested
//! dimension (default: all seven), each with a unique id and non-empty
//! name/description referencing the CDE's name.

use std::collections::HashMap;

use gov_core::domain::dq::DqDimension;
use gov_core::domain::dq::DqRule;
use gov_core::domain::dq::RuleLogic;
use gov_core::domain::dq::RuleLogicType;
use gov_core::domain::dq::RuleThreshold;
use gov_core::domain::dq::ThresholdType;
use gov_core::domain::issue::Severity;
use gov_core::identifiers::CdeId;
use gov_core::identifiers::DqRuleId;

/// The default pass-rate threshold applied to a generated rule, absent a
/// caller-supplied override: 95% of sampled records must satisfy the rule.
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// The default severity assigned to a generated rule's violations.
pub const DEFAULT_SEVERITY: Severity = Severity::Medium;

/// Builds the canned pattern expression for `dimension` against `cde_name`.
fn pattern_for(dimension: DqDimension, cde_name: &str) -> String {
    match dimension {
        DqDimension::Completeness => format!("{cde_name} is not null and not empty"),
        DqDimension::Accuracy => format!("{cde_name} matches authoritative source"),
        DqDimension::Validity => format!("{cde_name} conforms to its declared format"),
        DqDimension::Consistency => format!("{cde_name} agrees across related records"),
        DqDimension::Timeliness => format!("{cde_name} was refreshed within the expected window"),
        DqDimension::Uniqueness => format!("{cde_name} has no unintended duplicates"),
        DqDimension::Integrity => format!("{cde_name} satisfies its referential relationships"),
    }
}

/// Generates one enabled [`DqRule`] per entry in `dimensions` (default: all
/// seven, in [`DqDimension::all`] order) against `cde_id`/`cde_name`.
#[must_use]
pub fn generate_dq_rules(
    cde_id: &CdeId,
    cde_name: &str,
    dimensions: Option<&[DqDimension]>,
    custom_thresholds: Option<&HashMap<DqDimension, f64>>,
    owner: Option<&str>,
) -> Vec<DqRule> {
    let default_dimensions = DqDimension::all();
    let dimensions = dimensions.unwrap_or(&default_dimensions);
    let owner = owner.unwrap_or("data_governance_team");

    dimensions
        .iter()
        .map(|&dimension| {
            let threshold_value = custom_thresholds.and_then(|map| map.get(&dimension).copied()).unwrap_or(DEFAULT_THRESHOLD);
            DqRule {
                id: DqRuleId::generate(),
                cde_id: cde_id.clone(),
                dimension,
                name: format!("{} {} rule", cde_name, dimension.label()),
                description: format!("Checks {} of {cde_name} against the {} dimension.", dimension.label(), dimension.label()),
                logic: RuleLogic {
                    logic_type: RuleLogicType::Pattern,
                    expression: pattern_for(dimension, cde_name),
                },
                threshold: RuleThreshold {
                    threshold_type: ThresholdType::Percentage,
                    value: threshold_value,
                },
                severity: DEFAULT_SEVERITY,
                owner: owner.to_string(),
                enabled: true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::generate_dq_rules;
    use gov_core::domain::dq::DqDimension;
    use gov_core::identifiers::CdeId;
    use std::collections::BTreeSet;
    use std::collections::HashMap;

    #[test]
    fn default_call_covers_all_seven_dimensions_enabled() {
        let rules = generate_dq_rules(&CdeId::new("cde-1"), "Customer Tax ID", None, None, None);
        assert_eq!(rules.len(), 7);
        assert!(rules.iter().all(|rule| rule.enabled));
        let ids: BTreeSet<_> = rules.iter().map(|rule| rule.id.clone()).collect();
        assert_eq!(ids.len(), 7);
        for rule in &rules {
            assert!(!rule.name.is_empty());
            assert!(!rule.description.is_empty());
            assert!(rule.name.contains("Customer Tax ID") || rule.description.contains("Customer Tax ID"));
        }
    }

    #[test]
    fn requested_subset_generates_exactly_those_dimensions() {
        let subset = [DqDimension::Completeness, DqDimension::Accuracy];
        let rules = generate_dq_rules(&CdeId::new("cde-1"), "SSN", Some(&subset), None, None);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn custom_thresholds_override_the_default() {
        let mut overrides = HashMap::new();
        overrides.insert(DqDimension::Completeness, 0.5);
        let subset = [DqDimension::Completeness];
        let rules = generate_dq_rules(&CdeId::new("cde-1"), "SSN", Some(&subset), Some(&overrides), None);
        assert!((rules[0].threshold.value - 0.5).abs() < 1e-9);
    }
}
