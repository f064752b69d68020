// crates/gov-core/src/context.rs
// ============================================================================
// Module: Tenant Context
// Description: Ambient, per-call identity and tenancy context threaded
//              explicitly through every governance operation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every governance operation is tenant-scoped and attributable to an actor.
//! `TenantContext` is constructed once at the edge of a request (CLI command,
//! scheduled job, worker pickup) and passed by value or reference from there;
//! this crate never stores tenancy or identity in global mutable state.

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::SessionId;
use crate::identifiers::TenantId;

/// The kind of actor performing an action, recorded on every audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    /// A human user acting through a reviewed interface.
    Human,
    /// An autonomous or semi-autonomous agent.
    Agent,
    /// The system itself, e.g. a scheduled job or automated transition.
    System,
}

/// Ambient identity and tenancy information for a single governance operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Tenant the operation is scoped to.
    pub tenant_id: TenantId,
    /// Identifier for the session or request this operation belongs to.
    pub session_id: SessionId,
    /// Identifier of the actor performing the operation.
    pub actor: String,
    /// Kind of the acting entity.
    pub actor_type: ActorType,
}

impl TenantContext {
    /// Builds a new tenant context.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        session_id: SessionId,
        actor: impl Into<String>,
        actor_type: ActorType,
    ) -> Self {
        Self {
            tenant_id,
            session_id,
            actor: actor.into(),
            actor_type,
        }
    }

    /// Returns `true` if the acting entity is a human.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.actor_type == ActorType::Human
    }
}

#[cfg(test)]
mod tests {
    use super::ActorType;
    use super::TenantContext;
    use crate::identifiers::SessionId;
    use crate::identifiers::TenantId;

    #[test]
    fn tracks_actor_kind() {
        let ctx = TenantContext::new(
            TenantId::new("tenant-a"),
            SessionId::generate(),
            "alice",
            ActorType::Human,
        );
        assert!(ctx.is_human());
    }
}
