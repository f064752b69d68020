// crates/gov-core/src/domain/report.rs
// ============================================================================
// Module: Regulatory Report & Catalog
// Description: Report definitions and the per-tenant catalog aggregate that
//              governs their review lifecycle.
// ============================================================================

//! ## Overview
//! A `RegulatoryReport` is immutable once a [`crate::domain::cycle::CycleInstance`]
//! references it. The `ReportCatalog` is a singleton-per-tenant aggregate
//! whose `status` enforces that any mutation of an `Approved`
//! catalog resets it to `Draft` and clears approval metadata.

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::ReportId;
use crate::time::Timestamp;

/// The regulatory jurisdiction a report is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// United States.
    Us,
    /// Canada.
    Ca,
}

/// A regulatory report definition.
///
/// # Invariants
/// - Immutable once a cycle references it; callers must not mutate a report
///   in place after `startCycle` has been called against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryReport {
    /// Unique identifier.
    pub id: ReportId,
    /// Human-readable report name.
    pub name: String,
    /// Filing jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Regulator the report is filed with.
    pub regulator: String,
    /// Filing frequency, e.g. `"quarterly"`.
    pub frequency: String,
    /// Rule describing how the due date is derived from the period end.
    pub due_date_rule: String,
    /// Organizational unit responsible for the report.
    pub responsible_unit: String,
    /// Timestamp of the most recent update to this definition.
    pub last_updated: Timestamp,
}

/// Lifecycle status of a [`ReportCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    /// Freely editable; not under review.
    Draft,
    /// Submitted and awaiting approval.
    PendingReview,
    /// Approved by a reviewer; immutable until modified.
    Approved,
    /// Rejected by a reviewer; may be resubmitted for review.
    Rejected,
}

/// The singleton-per-tenant aggregate of regulatory reports.
///
/// # Invariants
/// - Any transition into `Approved` originates from `PendingReview`; any
///   mutation of an `Approved` catalog resets it to `Draft` and clears
///   `approved_by`/`approved_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCatalog {
    /// Monotonically increasing version, bumped on every mutation.
    pub version: u64,
    /// Current review status.
    pub status: CatalogStatus,
    /// Reports currently in the catalog.
    pub reports: Vec<RegulatoryReport>,
    /// Actor who approved the catalog, if approved.
    pub approved_by: Option<String>,
    /// Timestamp of approval, if approved.
    pub approved_at: Option<Timestamp>,
}

impl ReportCatalog {
    /// Builds an empty catalog in `Draft` status at version `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: 0,
            status: CatalogStatus::Draft,
            reports: Vec::new(),
            approved_by: None,
            approved_at: None,
        }
    }

    /// Resets the catalog to `Draft` and clears approval metadata. Called by
    /// any mutation applied to an `Approved` catalog; the caller owns the
    /// single version bump for that mutation.
    pub fn reset_to_draft(&mut self) {
        self.status = CatalogStatus::Draft;
        self.approved_by = None;
        self.approved_at = None;
    }
}

impl Default for ReportCatalog {
    fn default() -> Self {
        Self::new()
    }
}
