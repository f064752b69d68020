// crates/gov-workflow/src/catalog.rs
// ============================================================================
// Module: Catalog Engine
// Description: The `ReportCatalog` review-state machine (§4.D).
// ============================================================================

//! ## Overview
//! `CatalogEngine` implements `submitForReview` / `approveCatalog` /
//! `rejectCatalog` / `modifyCatalog` / `getCatalog`. Any mutation applied to
//! an `Approved` catalog resets it to `Draft` via
//! [`ReportCatalog::reset_to_draft`] before the mutation is recorded.
//! `submitForReview` is legal from both `Draft` and `Rejected`, since
//! nothing in the governance model benefits from forcing a rejected catalog
//! back through a draft edit first (see `DESIGN.md`).
//!
//! Privileged commands accept an optional [`AccessToken`]; when present and
//! verified, its subject supersedes the caller-supplied actor for the
//! recorded audit entry, and its extra claims are captured as
//! `_audit_user_info`.

use std::sync::Arc;

use gov_audit::AuditStore;
use gov_core::Repository;
use gov_core::TenantContext;
use gov_core::Timestamp;
use gov_core::domain::audit::AuditEntry;
use gov_core::domain::report::CatalogStatus;
use gov_core::domain::report::RegulatoryReport;
use gov_core::domain::report::ReportCatalog;
use gov_core::identity::AccessToken;
use gov_core::identity::IdentityVerifier;
use serde_json::json;

use crate::error::WorkflowError;

/// Coordinates `ReportCatalog` lifecycle commands against a [`Repository`]
/// and an [`AuditStore`], resolving privileged actors through an
/// [`IdentityVerifier`].
pub struct CatalogEngine {
    repository: Arc<dyn Repository>,
    audit: Arc<AuditStore>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl CatalogEngine {
    /// Builds an engine over `repository`, `audit`, and `verifier`.
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>, audit: Arc<AuditStore>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { repository, audit, verifier }
    }

    /// Returns the tenant's catalog, creating an empty `Draft` one on first
    /// access so callers never need a separate "initialize" command.
    #[must_use]
    pub fn get_catalog(&self, ctx: &TenantContext) -> ReportCatalog {
        self.repository.get_catalog(&ctx.tenant_id).unwrap_or_default()
    }

    /// Adds or replaces `report` in the catalog. Resets an `Approved`
    /// catalog to `Draft`.
    pub fn modify_catalog(&self, ctx: &TenantContext, report: RegulatoryReport) -> Result<ReportCatalog, WorkflowError> {
        let mut catalog = self.get_catalog(ctx);
        let was_approved = catalog.status == CatalogStatus::Approved;
        if was_approved {
            catalog.reset_to_draft();
        }
        catalog.reports.retain(|existing| existing.id != report.id);
        catalog.reports.push(report.clone());
        catalog.version += 1;
        self.repository.put_catalog(&ctx.tenant_id, catalog.clone());
        self.repository.put_report(&ctx.tenant_id, report.clone());

        self.append(
            ctx,
            &ctx.actor,
            "modify_catalog",
            catalog.version,
            Some(json!({ "reset_from_approved": was_approved })),
            Some(json!({ "report_id": report.id, "status": catalog.status })),
            None,
        )?;
        Ok(catalog)
    }

    /// Submits the catalog for review. Legal from `Draft` and `Rejected`.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidState`] from any other status, or
    /// propagates an access-token verification failure.
    pub fn submit_for_review(&self, ctx: &TenantContext, token: Option<&AccessToken>) -> Result<ReportCatalog, WorkflowError> {
        let mut catalog = self.get_catalog(ctx);
        if !matches!(catalog.status, CatalogStatus::Draft | CatalogStatus::Rejected) {
            return Err(WorkflowError::InvalidState(format!("cannot submit catalog in {:?} status for review", catalog.status)));
        }
        let (actor, claims) = self.resolve_privileged_actor(ctx, token)?;

        catalog.status = CatalogStatus::PendingReview;
        catalog.version += 1;
        self.repository.put_catalog(&ctx.tenant_id, catalog.clone());

        self.append(ctx, &actor, "submit_for_review", catalog.version, None, Some(json!({ "status": catalog.status })), claims)?;
        Ok(catalog)
    }

    /// Approves the catalog, recording `approved_by`/`approved_at`.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidState`] if the catalog is not
    /// `PendingReview`.
    pub fn approve_catalog(&self, ctx: &TenantContext, token: Option<&AccessToken>) -> Result<ReportCatalog, WorkflowError> {
        let mut catalog = self.get_catalog(ctx);
        if catalog.status != CatalogStatus::PendingReview {
            return Err(WorkflowError::InvalidState(format!("cannot approve catalog in {:?} status", catalog.status)));
        }
        let (actor, claims) = self.resolve_privileged_actor(ctx, token)?;

        catalog.status = CatalogStatus::Approved;
        catalog.approved_by = Some(actor.clone());
        catalog.approved_at = Some(Timestamp::now());
        catalog.version += 1;
        self.repository.put_catalog(&ctx.tenant_id, catalog.clone());

        self.append(ctx, &actor, "approve_catalog", catalog.version, None, Some(json!({ "status": catalog.status, "approved_by": actor })), claims)?;
        Ok(catalog)
    }

    /// Rejects the catalog, recording `reason`.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidState`] if the catalog is not
    /// `PendingReview`.
    pub fn reject_catalog(&self, ctx: &TenantContext, reason: &str, token: Option<&AccessToken>) -> Result<ReportCatalog, WorkflowError> {
        let mut catalog = self.get_catalog(ctx);
        if catalog.status != CatalogStatus::PendingReview {
            return Err(WorkflowError::InvalidState(format!("cannot reject catalog in {:?} status", catalog.status)));
        }
        let (actor, claims) = self.resolve_privileged_actor(ctx, token)?;

        catalog.status = CatalogStatus::Rejected;
        catalog.version += 1;
        self.repository.put_catalog(&ctx.tenant_id, catalog.clone());

        self.append(ctx, &actor, "reject_catalog", catalog.version, None, Some(json!({ "status": catalog.status, "reason": reason })), claims)?;
        Ok(catalog)
    }

    /// Resolves the acting subject for a privileged command, returning any
    /// extra claims to be captured as `_audit_user_info`.
    fn resolve_privileged_actor(&self, ctx: &TenantContext, token: Option<&AccessToken>) -> Result<(String, Option<serde_json::Value>), WorkflowError> {
        match token {
            Some(token) => {
                let claims = self.verifier.verify(token).map_err(WorkflowError::Unauthorized)?;
                let extra = serde_json::to_value(&claims.extra).map_err(|err| WorkflowError::InvariantViolation(err.to_string()))?;
                Ok((claims.subject, Some(extra)))
            }
            None => Ok((ctx.actor.clone(), None)),
        }
    }

    /// Appends an audit entry for a catalog-family command, attaching
    /// `_audit_user_info` when privileged-token claims were resolved.
    #[allow(clippy::too_many_arguments, reason = "mirrors the breadth of optional audit fields a catalog command may supply")]
    fn append(
        &self,
        ctx: &TenantContext,
        actor: &str,
        action: &str,
        version: u64,
        previous_state: Option<serde_json::Value>,
        new_state: Option<serde_json::Value>,
        audit_user_info: Option<serde_json::Value>,
    ) -> Result<(), WorkflowError> {
        let chain = self.audit.chain_for(&ctx.tenant_id);
        let mut entry = AuditEntry::new(actor, ctx.actor_type, action, "report_catalog", version.to_string()).with_tenant(ctx.tenant_id.clone());
        if let Some(previous) = previous_state {
            entry = entry.with_previous_state(previous);
        }
        let new_state = match (new_state, audit_user_info) {
            (Some(mut new_state), Some(user_info)) => {
                if let Some(obj) = new_state.as_object_mut() {
                    obj.insert("_audit_user_info".to_string(), user_info);
                }
                Some(new_state)
            }
            (new_state, _) => new_state,
        };
        if let Some(new_state) = new_state {
            entry = entry.with_new_state(new_state);
        }
        chain.append(entry).map_err(WorkflowError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogEngine;
    use gov_audit::AuditStore;
    use gov_core::ActorType;
    use gov_core::InMemoryRepository;
    use gov_core::TenantContext;
    use gov_core::domain::report::CatalogStatus;
    use gov_core::domain::report::Jurisdiction;
    use gov_core::domain::report::RegulatoryReport;
    use gov_core::identifiers::ReportId;
    use gov_core::identifiers::SessionId;
    use gov_core::identifiers::TenantId;
    use gov_core::identity::AccessToken;
    use gov_core::identity::Claims;
    use gov_core::identity::StaticIdentityVerifier;
    use gov_core::time::Timestamp;
    use std::sync::Arc;

    fn ctx() -> TenantContext {
        TenantContext::new(TenantId::new("t1"), SessionId::generate(), "alice", ActorType::Human)
    }

    fn engine() -> CatalogEngine {
        CatalogEngine::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(AuditStore::new()),
            Arc::new(StaticIdentityVerifier::new().with_token("tok-1", Claims::new("regulatory-officer"))),
        )
    }

    fn sample_report() -> RegulatoryReport {
        RegulatoryReport {
            id: ReportId::new("r1"),
            name: "sample".to_string(),
            jurisdiction: Jurisdiction::Us,
            regulator: "FED".to_string(),
            frequency: "quarterly".to_string(),
            due_date_rule: "30 days after period end".to_string(),
            responsible_unit: "risk".to_string(),
            last_updated: Timestamp::now(),
        }
    }

    #[test]
    fn full_review_cycle_reaches_approved() {
        let engine = engine();
        engine.modify_catalog(&ctx(), sample_report()).unwrap_or_else(|err| panic!("{err}"));
        engine.submit_for_review(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));
        let approved = engine.approve_catalog(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(approved.status, CatalogStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("alice"));
    }

    #[test]
    fn resubmission_from_rejected_is_legal() {
        let engine = engine();
        engine.modify_catalog(&ctx(), sample_report()).unwrap_or_else(|err| panic!("{err}"));
        engine.submit_for_review(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));
        engine.reject_catalog(&ctx(), "missing detail", None).unwrap_or_else(|err| panic!("{err}"));
        let resubmitted = engine.submit_for_review(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(resubmitted.status, CatalogStatus::PendingReview);
    }

    #[test]
    fn modifying_an_approved_catalog_resets_it_to_draft() {
        let engine = engine();
        engine.modify_catalog(&ctx(), sample_report()).unwrap_or_else(|err| panic!("{err}"));
        engine.submit_for_review(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));
        engine.approve_catalog(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));

        let mut other_report = sample_report();
        other_report.id = ReportId::new("r2");
        let reset = engine.modify_catalog(&ctx(), other_report).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(reset.status, CatalogStatus::Draft);
        assert!(reset.approved_by.is_none());
    }

    #[test]
    fn modifying_an_approved_catalog_bumps_version_by_exactly_one() {
        let engine = engine();
        let after_first_modify = engine.modify_catalog(&ctx(), sample_report()).unwrap_or_else(|err| panic!("{err}"));
        engine.submit_for_review(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));
        engine.approve_catalog(&ctx(), None).unwrap_or_else(|err| panic!("{err}"));

        let mut other_report = sample_report();
        other_report.id = ReportId::new("r2");
        let reset = engine.modify_catalog(&ctx(), other_report).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(reset.version, after_first_modify.version + 3);
    }

    #[test]
    fn approve_without_pending_review_is_rejected() {
        let engine = engine();
        let result = engine.approve_catalog(&ctx(), None);
        assert!(result.is_err());
    }

    #[test]
    fn verified_access_token_subject_supersedes_caller_actor() {
        let engine = engine();
        engine.modify_catalog(&ctx(), sample_report()).unwrap_or_else(|err| panic!("{err}"));
        let catalog = engine.submit_for_review(&ctx(), Some(&AccessToken::new("tok-1"))).unwrap_or_else(|err| panic!("{err}"));
        let approved = engine.approve_catalog(&ctx(), Some(&AccessToken::new("tok-1"))).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(approved.approved_by.as_deref(), Some("regulatory-officer"));
        assert_eq!(catalog.status, CatalogStatus::PendingReview);
    }

    #[test]
    fn unrecognized_access_token_is_rejected() {
        let engine = engine();
        engine.modify_catalog(&ctx(), sample_report()).unwrap_or_else(|err| panic!("{err}"));
        let result = engine.submit_for_review(&ctx(), Some(&AccessToken::new("bogus")));
        assert!(result.is_err());
    }
}
