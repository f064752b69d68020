// crates/gov-cli/src/session.rs
// ============================================================================
// Module: Session
// Description: Loads/saves the JSON session snapshot a `gov-cli` invocation
//              operates against (§6 "Persisted state layout").
// ============================================================================

//! ## Overview
//! The governance core mandates no storage format beyond "ordered log per
//! tenant" for audit entries and "key→value per entity family" for
//! repository snapshots (§6). `gov-cli` picks one concrete, self-contained
//! JSON file as its session format: a [`gov_core::RepositorySnapshot`] plus
//! each tenant's audit entries, loaded fresh at the start of every
//! invocation and written back at the end. Queue, scheduler, and metering
//! state are deliberately absent here — only entries and
//! repository snapshots are persisted state; those subsystems are exercised
//! per-invocation via their own `run`/ops-file commands.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use gov_audit::AuditStore;
use gov_audit::ImmutableAuditEntry;
use gov_core::InMemoryRepository;
use gov_core::RepositorySnapshot;
use gov_core::identifiers::TenantId;
use serde::Deserialize;
use serde::Serialize;

use crate::error::CliError;

/// The on-disk shape of a `gov-cli` session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    repository: RepositorySnapshot,
    #[serde(default)]
    audit: HashMap<TenantId, Vec<ImmutableAuditEntry>>,
}

/// The live engines a single CLI invocation operates against, loaded from
/// and saved back to a session file.
pub struct Session {
    /// The shared repository every engine is constructed over.
    pub repository: Arc<InMemoryRepository>,
    /// The shared audit store every engine appends into.
    pub audit: Arc<AuditStore>,
}

impl Session {
    /// Loads the session at `path`, or an empty session if it does not yet
    /// exist (the CLI's first invocation against a fresh session file).
    ///
    /// # Errors
    /// Returns [`CliError::Session`] if `path` exists but can't be read, or
    /// [`CliError::SessionFormat`] if its contents aren't valid JSON.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self {
                repository: Arc::new(InMemoryRepository::new()),
                audit: Arc::new(AuditStore::new()),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Session {
            path: path.display().to_string(),
            source,
        })?;
        let file: SessionFile = serde_json::from_str(&text).map_err(|source| CliError::SessionFormat {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            repository: Arc::new(InMemoryRepository::from_snapshot(file.repository)),
            audit: Arc::new(AuditStore::from_snapshot(file.audit)),
        })
    }

    /// Writes the current repository and audit state back to `path`.
    ///
    /// # Errors
    /// Returns [`CliError::SessionFormat`] if serialization fails, or
    /// [`CliError::Session`] if `path` can't be written.
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let file = SessionFile {
            repository: self.repository.snapshot(),
            audit: self.audit.snapshot(),
        };
        let text = serde_json::to_string_pretty(&file).map_err(|source| CliError::SessionFormat {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| CliError::Session {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use gov_core::ActorType;
    use gov_core::Repository;
    use gov_core::TenantContext;
    use gov_core::domain::issue::Issue;
    use gov_core::domain::issue::IssueStatus;
    use gov_core::domain::issue::Severity;
    use gov_core::identifiers::IssueId;
    use gov_core::identifiers::SessionId;
    use gov_core::identifiers::TenantId;
    use gov_core::time::Timestamp;
    use std::collections::BTreeSet;

    #[test]
    fn missing_session_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("{err}"));
        let path = dir.path().join("session.json");
        let session = Session::load(&path).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(session.audit.chain_for(&TenantId::new("t1")).entry_count(), 0);
    }

    #[test]
    fn save_then_load_round_trips_repository_and_audit() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("{err}"));
        let path = dir.path().join("session.json");
        let tenant = TenantId::new("t1");

        let session = Session::load(&path).unwrap_or_else(|err| panic!("{err}"));
        session
            .repository
            .create_issue(
                &tenant,
                Issue {
                    id: IssueId::new("i1"),
                    title: "t".to_string(),
                    severity: Severity::High,
                    status: IssueStatus::Open,
                    impacted_reports: BTreeSet::new(),
                    impacted_cdes: BTreeSet::new(),
                    escalation_level: 0,
                    escalated_at: None,
                    resolution: None,
                    created_at: Timestamp::now(),
                },
            )
            .unwrap_or_else(|err| panic!("{err}"));
        let ctx = TenantContext::new(tenant.clone(), SessionId::generate(), "alice", ActorType::Human);
        let entry = gov_core::domain::audit::AuditEntry::new(&ctx.actor, ctx.actor_type, "create_issue", "issue", "i1");
        session.audit.chain_for(&tenant).append(entry).unwrap_or_else(|err| panic!("{err}"));
        session.save(&path).unwrap_or_else(|err| panic!("{err}"));

        let reloaded = Session::load(&path).unwrap_or_else(|err| panic!("{err}"));
        assert!(reloaded.repository.get_issue(&tenant, &IssueId::new("i1")).is_some());
        assert_eq!(reloaded.audit.chain_for(&tenant).entry_count(), 1);
    }
}
