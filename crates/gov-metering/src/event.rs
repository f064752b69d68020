// crates/gov-metering/src/event.rs
// ============================================================================
// Module: Usage Event
// Description: The unit of metering captured by `recordEvent` (§4.I).
// ============================================================================

use gov_core::Timestamp;
use gov_core::identifiers::TenantId;
use gov_core::identifiers::generate_id;
use serde::Deserialize;
use serde::Serialize;

/// The kind of activity a [`UsageEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A single agent invocation, typically carrying token counts.
    AgentInvocation,
    /// A single inbound API call.
    ApiCall,
    /// Bytes written to tenant-scoped storage.
    StorageWrite,
    /// Bytes read from tenant-scoped storage.
    StorageRead,
}

/// A single metered unit of activity (§4.I `recordEvent`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// Unique identifier for this event.
    pub id: String,
    /// The kind of activity recorded.
    pub event_type: EventType,
    /// The tenant this event is attributed to.
    pub tenant_id: TenantId,
    /// When the event occurred.
    pub timestamp: Timestamp,
    /// The number of units this event represents (invocations, calls, ...).
    pub quantity: u64,
    /// Tokens consumed from the prompt/input side, if applicable.
    pub tokens_in: u64,
    /// Tokens produced on the completion/output side, if applicable.
    pub tokens_out: u64,
    /// Bytes transferred, if this is a storage event.
    pub bytes: u64,
    /// The agent that produced this event, if any.
    pub agent_id: Option<String>,
    /// The human user attributed to this event, if any.
    pub user_id: Option<String>,
}

impl UsageEvent {
    /// Builds a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, tenant_id: TenantId, quantity: u64, tokens_in: u64, tokens_out: u64, bytes: u64) -> Self {
        Self {
            id: generate_id(),
            event_type,
            tenant_id,
            timestamp: Timestamp::now(),
            quantity,
            tokens_in,
            tokens_out,
            bytes,
            agent_id: None,
            user_id: None,
        }
    }

    /// Attaches the agent attributed to this event.
    #[must_use]
    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Attaches the human user attributed to this event.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Returns `tokens_in + tokens_out`.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.tokens_in + self.tokens_out
    }
}
