// crates/gov-issues/src/manager.rs
// ============================================================================
// Module: Issue Manager
// Description: Severity-indexed issue store, escalation ladder, and the
//              four-eyes resolution gate (§4.E).
// ============================================================================

use std::sync::Arc;

use gov_audit::AuditStore;
use gov_core::ActorType;
use gov_core::Repository;
use gov_core::TenantContext;
use gov_core::Timestamp;
use gov_core::domain::audit::AuditEntry;
use gov_core::domain::issue::Issue;
use gov_core::domain::issue::IssueMetrics;
use gov_core::domain::issue::IssueStatus;
use gov_core::domain::issue::Resolution;
use gov_core::domain::issue::Severity;
use gov_core::identifiers::IssueId;
use gov_core::repository::IssueFilter;
use serde_json::json;

use crate::error::IssueError;

/// Coordinates issue lifecycle commands against a [`Repository`] and an
/// [`AuditStore`], emitting an audit entry for every state-changing command.
pub struct IssueManager {
    repository: Arc<dyn Repository>,
    audit: Arc<AuditStore>,
}

impl IssueManager {
    /// Builds a manager over `repository` and `audit`.
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>, audit: Arc<AuditStore>) -> Self {
        Self { repository, audit }
    }

    /// Creates `issue`, generating an id if the caller left it empty.
    ///
    /// # Errors
    /// Returns [`IssueError::AlreadyExists`] if `issue.id` is already in use,
    /// or [`IssueError::Audit`] if the resulting audit entry fails to append.
    pub fn create_issue(&self, ctx: &TenantContext, mut issue: Issue) -> Result<Issue, IssueError> {
        if issue.id.as_str().is_empty() {
            issue.id = IssueId::generate();
        }
        self.repository
            .create_issue(&ctx.tenant_id, issue.clone())
            .map_err(|_| IssueError::AlreadyExists(issue.id.to_string()))?;

        let chain = self.audit.chain_for(&ctx.tenant_id);
        let entry = AuditEntry::new(&ctx.actor, ctx.actor_type, "create_issue", "issue", issue.id.to_string())
            .with_tenant(ctx.tenant_id.clone())
            .with_new_state(json!({
                "severity": issue.severity,
                "status": issue.status,
            }));
        chain.append(entry)?;

        Ok(issue)
    }

    /// Increments `issue_id`'s escalation level and records the escalation
    /// time. Critical-severity issues additionally emit a
    /// `notify_senior_management` audit entry.
    ///
    /// # Errors
    /// Returns [`IssueError::NotFound`] if `issue_id` does not exist.
    pub fn escalate_issue(&self, ctx: &TenantContext, issue_id: &IssueId, reason: &str) -> Result<Issue, IssueError> {
        let mut issue = self
            .repository
            .get_issue(&ctx.tenant_id, issue_id)
            .ok_or_else(|| IssueError::NotFound(issue_id.to_string()))?;

        issue.escalation_level += 1;
        issue.escalated_at = Some(Timestamp::now());
        self.repository.update_issue(&ctx.tenant_id, issue.clone());

        let chain = self.audit.chain_for(&ctx.tenant_id);
        let entry = AuditEntry::new(&ctx.actor, ctx.actor_type, "escalate_issue", "issue", issue_id.to_string())
            .with_tenant(ctx.tenant_id.clone())
            .with_rationale(reason)
            .with_new_state(json!({ "escalation_level": issue.escalation_level }));
        chain.append(entry)?;

        if issue.severity == Severity::Critical {
            let notification = AuditEntry::new(
                &ctx.actor,
                ActorType::System,
                "notify_senior_management",
                "issue",
                issue_id.to_string(),
            )
            .with_tenant(ctx.tenant_id.clone())
            .with_new_state(json!({
                "notification_type": "critical_issue_escalation",
                "escalation_level": issue.escalation_level,
                "reason": reason,
            }));
            chain.append(notification)?;
        }

        Ok(issue)
    }

    /// Resolves `issue_id` with a four-eyes-checked resolution record.
    ///
    /// # Errors
    /// Returns [`IssueError::FourEyesViolation`] if `implemented_by ==
    /// verified_by`, or [`IssueError::NotFound`] if `issue_id` does not exist.
    pub fn resolve_issue(
        &self,
        ctx: &TenantContext,
        issue_id: &IssueId,
        resolution_type: &str,
        description: &str,
        implemented_by: &str,
        verified_by: &str,
    ) -> Result<Issue, IssueError> {
        if implemented_by == verified_by {
            return Err(IssueError::FourEyesViolation {
                actor: implemented_by.to_string(),
            });
        }

        let mut issue = self
            .repository
            .get_issue(&ctx.tenant_id, issue_id)
            .ok_or_else(|| IssueError::NotFound(issue_id.to_string()))?;

        let now = Timestamp::now();
        issue.resolution = Some(Resolution {
            resolution_type: resolution_type.to_string(),
            description: description.to_string(),
            implemented_by: implemented_by.to_string(),
            implemented_at: now,
            verified_by: verified_by.to_string(),
            verified_at: now,
        });
        issue.status = IssueStatus::Resolved;
        self.repository.update_issue(&ctx.tenant_id, issue.clone());

        let chain = self.audit.chain_for(&ctx.tenant_id);
        let entry = AuditEntry::new(verified_by, ActorType::Human, "resolve_issue", "issue", issue_id.to_string())
            .with_tenant(ctx.tenant_id.clone())
            .with_new_state(json!({
                "status": issue.status,
                "resolution_type": resolution_type,
                "implemented_by": implemented_by,
                "verified_by": verified_by,
            }));
        chain.append(entry)?;

        Ok(issue)
    }

    /// Lists issues matching `filter`.
    #[must_use]
    pub fn list_issues(&self, ctx: &TenantContext, filter: &IssueFilter) -> Vec<Issue> {
        self.repository.list_issues(&ctx.tenant_id, filter)
    }

    /// Computes aggregate issue metrics (§4.E `metrics()`).
    #[must_use]
    pub fn metrics(&self, ctx: &TenantContext) -> IssueMetrics {
        let all = self.repository.list_issues(&ctx.tenant_id, &IssueFilter::default());

        let open: Vec<&Issue> = all.iter().filter(|issue| issue.status.counts_as_open()).collect();
        let mut open_by_severity = std::collections::BTreeMap::new();
        for severity in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            let count = open.iter().filter(|issue| issue.severity == severity).count();
            open_by_severity.insert(severity, count);
        }

        let resolved: Vec<&Issue> = all
            .iter()
            .filter(|issue| matches!(issue.status, IssueStatus::Resolved | IssueStatus::Closed) && issue.resolution.is_some())
            .collect();
        let avg_resolution_time_secs = if resolved.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss, reason = "resolution counts are small; precision loss is immaterial for an averaged metric")]
            let count = resolved.len() as f64;
            let total: i64 = resolved
                .iter()
                .filter_map(|issue| {
                    issue.resolution.as_ref().map(|resolution| resolution.verified_at.unix_timestamp() - issue.created_at.unix_timestamp())
                })
                .sum();
            #[allow(clippy::cast_precision_loss, reason = "elapsed seconds fits comfortably in f64's integer-exact range for any realistic resolution time")]
            let total = total as f64;
            total / count
        };

        IssueMetrics {
            open_count: open.len(),
            open_by_severity,
            avg_resolution_time_secs,
        }
    }
}
