// crates/gov-core/src/domain/dq.rs
// ============================================================================
// Module: Data Quality Rules
// Description: The seven orthogonal data-quality dimensions and the rule
//              records generated against a CDE for each.
// ============================================================================

//! ## Overview
//! A [`DqRule`] binds one [`DqDimension`] to a single CDE. `generateDQRules`
//! produces exactly one enabled rule per requested dimension, seven by
//! default.

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::CdeId;
use crate::identifiers::DqRuleId;
use crate::identifiers::IssueId;

/// One of the seven orthogonal facets of data quality a [`DqRule`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DqDimension {
    /// Required fields are populated.
    Completeness,
    /// Values match ground truth.
    Accuracy,
    /// Values conform to their declared format/domain.
    Validity,
    /// Values agree across related records or systems.
    Consistency,
    /// Values are refreshed within an expected window.
    Timeliness,
    /// No unintended duplicate records.
    Uniqueness,
    /// Referential relationships hold.
    Integrity,
}

impl DqDimension {
    /// All seven dimensions, in the canonical generation order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Completeness,
            Self::Accuracy,
            Self::Validity,
            Self::Consistency,
            Self::Timeliness,
            Self::Uniqueness,
            Self::Integrity,
        ]
    }

    /// Returns the lower-snake-case name used in generated rule text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Accuracy => "accuracy",
            Self::Validity => "validity",
            Self::Consistency => "consistency",
            Self::Timeliness => "timeliness",
            Self::Uniqueness => "uniqueness",
            Self::Integrity => "integrity",
        }
    }
}

/// The kind of check logic a [`DqRule`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleLogicType {
    /// A boolean or numeric expression evaluated against sampled data.
    Expression,
    /// A canned pattern keyed by dimension, with no custom expression.
    Pattern,
}

/// The evaluable logic attached to a [`DqRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleLogic {
    /// Kind of logic.
    pub logic_type: RuleLogicType,
    /// Expression or pattern text; never empty.
    pub expression: String,
}

/// The kind of threshold value a [`RuleThreshold`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdType {
    /// `value` is a fraction in `[0, 1]` of passing records required.
    Percentage,
    /// `value` is an absolute count of allowed violations.
    Count,
}

/// The pass/fail threshold attached to a [`DqRule`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThreshold {
    /// Kind of threshold.
    pub threshold_type: ThresholdType,
    /// Threshold value; `[0, 1]` when `threshold_type = Percentage`.
    pub value: f64,
}

/// A generated data-quality rule bound to one CDE and dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqRule {
    /// Unique identifier.
    pub id: DqRuleId,
    /// The CDE this rule evaluates.
    pub cde_id: CdeId,
    /// Dimension this rule checks.
    pub dimension: DqDimension,
    /// Non-empty rule name, referencing the CDE's name.
    pub name: String,
    /// Non-empty description, referencing the CDE's name.
    pub description: String,
    /// Evaluation logic.
    pub logic: RuleLogic,
    /// Pass/fail threshold.
    pub threshold: RuleThreshold,
    /// Severity of a violation of this rule.
    pub severity: crate::domain::issue::Severity,
    /// Actor/team responsible for maintaining this rule.
    pub owner: String,
    /// Whether the rule is currently active.
    pub enabled: bool,
}

/// Outcome of evaluating a [`DqRule`] against a batch of data, optionally
/// linked to an [`Issue`](crate::domain::issue::Issue) when it fails.
///
/// Stores time-filterable execution history per rule, carrying the minimal
/// record needed for that query surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleExecutionResult {
    /// The rule that was evaluated.
    pub rule_id: DqRuleId,
    /// When the evaluation ran.
    pub executed_at: crate::time::Timestamp,
    /// Whether the batch passed the rule's threshold.
    pub passed: bool,
    /// Observed pass rate or violation count, matching `threshold.threshold_type`.
    pub observed_value: f64,
    /// Issue raised as a consequence of this evaluation, if it failed.
    pub raised_issue: Option<IssueId>,
}

#[cfg(test)]
mod tests {
    use super::DqDimension;

    #[test]
    fn all_seven_dimensions_present_and_unique() {
        let all = DqDimension::all();
        assert_eq!(all.len(), 7);
        let labels: std::collections::BTreeSet<_> = all.iter().map(|d| d.label()).collect();
        assert_eq!(labels.len(), 7);
    }
}
