// crates/gov-audit/src/filter.rs
// ============================================================================
// Module: Audit Filter
// Description: Conjunctive query filter over audit-entry listings.
// ============================================================================

use gov_core::Timestamp;

use crate::chain::ImmutableAuditEntry;

/// Conjunctive filter over [`ImmutableAuditEntry`] listings; unset fields
/// match any value. `list_entries` returns matches most-recent first;
/// `verify_chain`/`export` ignore this filter entirely and always walk
/// strict ascending sequence order, since hash-chain order matters there.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Restrict to this entity family.
    pub entity_type: Option<String>,
    /// Restrict to this entity id.
    pub entity_id: Option<String>,
    /// Restrict to this actor.
    pub actor: Option<String>,
    /// Restrict to this action name.
    pub action: Option<String>,
    /// Only entries at or after this time.
    pub since: Option<Timestamp>,
    /// Only entries at or before this time.
    pub until: Option<Timestamp>,
    /// Cap the number of results returned (applied after ordering).
    pub limit: Option<usize>,
}

impl AuditFilter {
    /// Returns `true` if `entry` satisfies every set field of this filter.
    #[must_use]
    pub(crate) fn matches(&self, entry: &ImmutableAuditEntry) -> bool {
        self.entity_type.as_deref().is_none_or(|t| entry.entry.entity_type == t)
            && self.entity_id.as_deref().is_none_or(|id| entry.entry.entity_id == id)
            && self.actor.as_deref().is_none_or(|actor| entry.entry.actor == actor)
            && self.action.as_deref().is_none_or(|action| entry.entry.action == action)
            && self.since.is_none_or(|since| entry.entry.timestamp >= since)
            && self.until.is_none_or(|until| entry.entry.timestamp <= until)
    }
}
