// crates/gov-core/src/domain/audit.rs
// ============================================================================
// Module: Audit Entry (mutable form)
// Description: The pre-chain audit record a caller builds before handing it
//              to `gov-audit` for sequencing and hashing.
// ============================================================================

//! ## Overview
//! `AuditEntry` is the mutable, unsequenced form an audit record starts as.
//! `gov-audit::ImmutableAuditEntry` wraps one of these with the
//! sequence/hash-chain fields once appended; nothing in this crate computes
//! hashes so `gov-core` stays free of the `sha2`/`serde_jcs` dependency.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::context::ActorType;
use crate::identifiers::AuditEntryId;
use crate::identifiers::TenantId;
use crate::time::Timestamp;

/// A not-yet-chained audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier, independent of chain sequence number.
    pub id: AuditEntryId,
    /// When the underlying action occurred.
    pub timestamp: Timestamp,
    /// Tenant the action is scoped to, if any.
    pub tenant_id: Option<TenantId>,
    /// Actor who performed the action.
    pub actor: String,
    /// Kind of the acting entity.
    pub actor_type: ActorType,
    /// Name of the action, e.g. `"approve_catalog"`.
    pub action: String,
    /// Entity family the action targeted, e.g. `"report_catalog"`.
    pub entity_type: String,
    /// Identifier of the targeted entity.
    pub entity_id: String,
    /// Entity state before the action, if applicable.
    pub previous_state: Option<Value>,
    /// Entity state after the action, if applicable.
    pub new_state: Option<Value>,
    /// Free-form justification for the action, if supplied.
    pub rationale: Option<String>,
}

impl AuditEntry {
    /// Builds a new unsequenced audit entry with a generated id and the
    /// current time as `timestamp`.
    #[must_use]
    #[allow(clippy::too_many_arguments, reason = "mirrors the audit entry's flat field set one-for-one")]
    pub fn new(
        actor: impl Into<String>,
        actor_type: ActorType,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            id: AuditEntryId::generate(),
            timestamp: Timestamp::now(),
            tenant_id: None,
            actor: actor.into(),
            actor_type,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            previous_state: None,
            new_state: None,
            rationale: None,
        }
    }

    /// Sets the tenant this entry is scoped to.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Attaches the pre-action entity state.
    #[must_use]
    pub fn with_previous_state(mut self, value: Value) -> Self {
        self.previous_state = Some(value);
        self
    }

    /// Attaches the post-action entity state.
    #[must_use]
    pub fn with_new_state(mut self, value: Value) -> Self {
        self.new_state = Some(value);
        self
    }

    /// Attaches a free-form rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}
