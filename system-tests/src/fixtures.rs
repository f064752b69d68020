// system-tests/src/fixtures.rs
// ============================================================================
// Module: Fixtures
// Description: Fresh in-memory repository/audit-store/tenant-context triples
//              for a single test's governance operations.
// ============================================================================

use std::sync::Arc;

use gov_audit::AuditStore;
use gov_core::ActorType;
use gov_core::InMemoryRepository;
use gov_core::TenantContext;
use gov_core::identifiers::SessionId;
use gov_core::identifiers::TenantId;

/// A fresh set of engines-under-test plus the tenant context every operation
/// in a test is performed under.
pub struct Harness {
    /// Shared in-memory repository.
    pub repository: Arc<InMemoryRepository>,
    /// Shared audit store.
    pub audit: Arc<AuditStore>,
    /// Tenant context every call in the test is scoped to.
    pub ctx: TenantContext,
}

impl Harness {
    /// Builds a harness for `tenant`, acting as `actor`.
    #[must_use]
    pub fn new(tenant: &str, actor: &str) -> Self {
        Self {
            repository: Arc::new(InMemoryRepository::new()),
            audit: Arc::new(AuditStore::new()),
            ctx: TenantContext::new(TenantId::new(tenant), SessionId::generate(), actor, ActorType::Human),
        }
    }

    /// Builds a harness for tenant `"t1"` acting as `"alice"`, the default
    /// used by tests with no tenant-isolation concern of their own.
    #[must_use]
    pub fn default_tenant() -> Self {
        Self::new("t1", "alice")
    }

    /// Returns a context identical to this harness's, acting as `actor`
    /// instead, for tests exercising multiple actors against one tenant.
    #[must_use]
    pub fn as_actor(&self, actor: &str) -> TenantContext {
        TenantContext::new(self.ctx.tenant_id.clone(), SessionId::generate(), actor, ActorType::Human)
    }
}
