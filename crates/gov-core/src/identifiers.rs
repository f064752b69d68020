// crates/gov-core/src/identifiers.rs
// ============================================================================
// Module: Governance Identifiers
// Description: Opaque string identifiers for governance entities.
// Purpose: Provide strongly typed, serializable identifiers with stable wire
//          forms and a deterministic-enough-for-tests generator.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque UTF-8 strings, typically UUIDs in production but
//! never parsed or validated as such by this crate — callers may supply any
//! non-empty string. Each entity family gets its own newtype so identifiers
//! cannot be accidentally swapped across entity boundaries at compile time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Id Generation
// ============================================================================

/// Generates a random, opaque 128-bit identifier rendered as lowercase hex.
///
/// Used when a caller creates an entity without supplying an id. Not a UUID
/// in the RFC 4122 sense (no version/variant bits are set) but indistinguishable
/// from one in the wire format callers see.
#[must_use]
pub fn generate_id() -> String {
    let high: u64 = rand::random();
    let low: u64 = rand::random();
    format!("{high:016x}{low:016x}")
}

// ============================================================================
// SECTION: Identifier Newtypes
// ============================================================================

/// Defines an opaque string identifier newtype with the shared accessor set.
macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        ///
        /// # Invariants
        /// - Opaque UTF-8 string; no normalization or validation is applied.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(generate_id())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

define_id!(TenantId, "Tenant identifier scoping all governance state.");
define_id!(SessionId, "Session identifier for an ambient request/task context.");
define_id!(ReportId, "Identifier for a `RegulatoryReport`.");
define_id!(CycleId, "Identifier for a `CycleInstance`.");
define_id!(HumanTaskId, "Identifier for a `HumanTask`.");
define_id!(IssueId, "Identifier for an `Issue`.");
define_id!(CdeId, "Identifier for a `CDE` (critical data element).");
define_id!(DqRuleId, "Identifier for a `DQRule`.");
define_id!(AuditEntryId, "Identifier for an `AuditEntry`.");
define_id!(TaskMessageId, "Identifier for a `TaskMessage`.");

#[cfg(test)]
mod tests {
    use super::CdeId;
    use super::TenantId;
    use super::generate_id;

    #[test]
    fn generated_ids_are_non_empty_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_id_types_do_not_compare_equal_by_construction() {
        let tenant = TenantId::new("same-text");
        let cde = CdeId::new("same-text");
        assert_eq!(tenant.as_str(), cde.as_str());
    }
}
