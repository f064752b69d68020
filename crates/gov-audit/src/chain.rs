// crates/gov-audit/src/chain.rs
// ============================================================================
// Module: Audit Chain
// Description: Per-tenant append-only, hash-chained audit log.
// ============================================================================

//! ## Overview
//! [`AuditChain`] is a single tenant's append-only log (§4.C). `append` is
//! its only mutation: no update, no delete, no reordering. A per-tenant
//! `Mutex` serializes `read last hash → compute → push` so concurrent
//! appenders can never interleave and corrupt sequencing (§5).
//!
//! [`AuditStore`] multiplexes many tenants' chains behind a short-lived
//! directory lock, handing each caller the long-lived per-tenant lock to
//! operate under — no operation here blocks on another tenant's chain.

use std::collections::HashMap;
use std::sync::Mutex;

use gov_core::domain::audit::AuditEntry;
use gov_core::identifiers::AuditEntryId;
use gov_core::identifiers::TenantId;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AuditError;
use crate::filter::AuditFilter;
use crate::hashing;
use crate::merkle;
use crate::merkle::ProofStep;

/// An appended, sequenced, hash-chained audit entry.
///
/// # Invariants
/// - `entry_hash = SHA256(canonical_json(entry, sequence_number, previous_hash))`.
/// - The first entry in a chain has `previous_hash = `[`hashing::GENESIS_HASH`].
/// - Entry *n > 0* has `previous_hash = entries[n-1].entry_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmutableAuditEntry {
    /// The underlying unsequenced entry.
    #[serde(flatten)]
    pub entry: AuditEntry,
    /// Position in the chain, starting at `0`.
    pub sequence_number: u64,
    /// Hash of the preceding entry, or the genesis hash for the first entry.
    pub previous_hash: String,
    /// `SHA256` over this entry's canonical fields (excluding this field itself).
    pub entry_hash: String,
}

/// The fields hashed to produce [`ImmutableAuditEntry::entry_hash`]: every
/// field of the entry plus its chain position, excluding the hash itself.
#[derive(Serialize)]
struct HashableEntry<'a> {
    #[serde(flatten)]
    entry: &'a AuditEntry,
    sequence_number: u64,
    previous_hash: &'a str,
}

/// Computes the entry hash for `entry` at `sequence_number` following `previous_hash`.
///
/// # Errors
/// Returns [`AuditError::Hashing`] if `entry` fails to canonicalize.
fn compute_entry_hash(entry: &AuditEntry, sequence_number: u64, previous_hash: &str) -> Result<String, AuditError> {
    let hashable = HashableEntry {
        entry,
        sequence_number,
        previous_hash,
    };
    hashing::hash_canonical_json(&hashable).map_err(AuditError::from)
}

/// Result of [`AuditChain::verify_chain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// `true` if every entry in range passed both checks.
    pub is_valid: bool,
    /// Sequence number of the first entry that failed verification, if any.
    pub first_invalid_sequence: Option<u64>,
    /// Merkle root over the verified range, present when `is_valid`.
    pub merkle_root: Option<String>,
    /// `"chain_broken"` or `"hash_tampered"`, present when `!is_valid`.
    pub error: Option<String>,
}

/// A single tenant's append-only hash chain.
#[derive(Debug, Default)]
pub struct AuditChain {
    state: Mutex<ChainState>,
}

#[derive(Debug, Default)]
struct ChainState {
    entries: Vec<ImmutableAuditEntry>,
    /// Tracks appends independently of `entries.len()` so a future
    /// range-limited storage backend can drop old entries without losing the
    /// true append count.
    sequence_counter: u64,
}

impl AuditChain {
    /// Builds an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a chain from previously-appended `entries` (e.g. loaded from
    /// a persisted snapshot, §6 "Persisted state layout"). The sequence
    /// counter resumes from `entries.len()`; callers are responsible for
    /// ensuring `entries` is itself a valid, contiguously-sequenced chain —
    /// use [`AuditChain::verify_chain`] after restoring if that isn't
    /// already guaranteed by the snapshot's provenance.
    #[must_use]
    pub fn from_entries(entries: Vec<ImmutableAuditEntry>) -> Self {
        #[allow(clippy::cast_possible_truncation, reason = "a snapshot realistically never holds more than u64::MAX entries")]
        let sequence_counter = entries.len() as u64;
        Self {
            state: Mutex::new(ChainState { entries, sequence_counter }),
        }
    }

    /// Returns a clone of every entry in the chain, in append order, for
    /// persisting to a snapshot.
    #[must_use]
    pub fn snapshot_entries(&self) -> Vec<ImmutableAuditEntry> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        state.entries.clone()
    }

    /// Appends `entry`, assigning it the next sequence number and hash.
    ///
    /// # Errors
    /// Returns [`AuditError::Hashing`] if `entry` fails to canonicalize.
    pub fn append(&self, entry: AuditEntry) -> Result<ImmutableAuditEntry, AuditError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut state = self.state.lock().unwrap();
        let sequence_number = state.sequence_counter;
        let previous_hash = state
            .entries
            .last()
            .map_or_else(|| hashing::GENESIS_HASH.to_string(), |last| last.entry_hash.clone());
        let entry_hash = compute_entry_hash(&entry, sequence_number, &previous_hash)?;
        let immutable = ImmutableAuditEntry {
            entry,
            sequence_number,
            previous_hash,
            entry_hash,
        };
        state.entries.push(immutable.clone());
        state.sequence_counter += 1;
        Ok(immutable)
    }

    /// Returns the number of entries appended so far.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        state.sequence_counter
    }

    /// Returns entries matching `filter`, most-recent first.
    #[must_use]
    pub fn list_entries(&self, filter: &AuditFilter) -> Vec<ImmutableAuditEntry> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        let mut matches: Vec<ImmutableAuditEntry> = state.entries.iter().filter(|entry| filter.matches(entry)).cloned().collect();
        matches.sort_by(|a, b| b.sequence_number.cmp(&a.sequence_number));
        if let Some(limit) = filter.limit {
            matches.truncate(limit);
        }
        matches
    }

    /// Returns a single entry by sequence number, if it exists.
    #[must_use]
    pub fn get_by_sequence(&self, sequence_number: u64) -> Option<ImmutableAuditEntry> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        state.entries.get(usize::try_from(sequence_number).ok()?).cloned()
    }

    /// Returns the `[start, end]` slice of entries in strict ascending
    /// sequence order, clamping an out-of-range `end` to the last valid
    /// index and treating `start > end` as empty.
    fn range(&self, start: Option<u64>, end: Option<u64>) -> Vec<ImmutableAuditEntry> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        if state.entries.is_empty() {
            return Vec::new();
        }
        let last_index = state.entries.len() - 1;
        let start = usize::try_from(start.unwrap_or(0)).unwrap_or(0);
        let end = end.map_or(last_index, |e| (usize::try_from(e).unwrap_or(last_index)).min(last_index));
        if start > end {
            return Vec::new();
        }
        state.entries[start..=end].to_vec()
    }

    /// Walks `[start, end]` verifying the hash chain and recomputed hashes.
    ///
    /// Never returns `Err`: `chain_broken`/`hash_tampered` are reported as
    /// fields of the result, per §7's "reported, never raised" policy.
    #[must_use]
    pub fn verify_chain(&self, start: Option<u64>, end: Option<u64>) -> ChainVerification {
        let entries = self.range(start, end);
        if entries.is_empty() {
            return ChainVerification {
                is_valid: true,
                first_invalid_sequence: None,
                merkle_root: None,
                error: None,
            };
        }

        let mut expected_previous = entries[0].previous_hash.clone();
        for (index, entry) in entries.iter().enumerate() {
            if index > 0 && entry.previous_hash != expected_previous {
                return ChainVerification {
                    is_valid: false,
                    first_invalid_sequence: Some(entry.sequence_number),
                    merkle_root: None,
                    error: Some("chain_broken".to_string()),
                };
            }
            let recomputed = compute_entry_hash(&entry.entry, entry.sequence_number, &entry.previous_hash);
            if recomputed.as_deref() != Ok(entry.entry_hash.as_str()) {
                return ChainVerification {
                    is_valid: false,
                    first_invalid_sequence: Some(entry.sequence_number),
                    merkle_root: None,
                    error: Some("hash_tampered".to_string()),
                };
            }
            expected_previous = entry.entry_hash.clone();
        }

        let leaves: Vec<String> = entries.iter().map(|entry| entry.entry_hash.clone()).collect();
        ChainVerification {
            is_valid: true,
            first_invalid_sequence: None,
            merkle_root: merkle::merkle_root(&leaves),
            error: None,
        }
    }

    /// Builds the Merkle inclusion proof for `entry_id` over the full chain.
    ///
    /// # Errors
    /// Returns [`AuditError::NotFound`] if no entry with `entry_id` exists.
    pub fn merkle_proof(&self, entry_id: &AuditEntryId) -> Result<MerkleProofResult, AuditError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        let index = state
            .entries
            .iter()
            .position(|entry| &entry.entry.id == entry_id)
            .ok_or_else(|| AuditError::NotFound(entry_id.to_string()))?;
        let leaves: Vec<String> = state.entries.iter().map(|entry| entry.entry_hash.clone()).collect();
        let proof_path = merkle::merkle_proof(&leaves, index).unwrap_or_default();
        let root = merkle::merkle_root(&leaves);
        Ok(MerkleProofResult {
            entry_hash: leaves[index].clone(),
            proof_path,
            merkle_root: root,
        })
    }

    /// Exports `[start, end]` as an [`crate::export::AuditExport`] body, without tenant metadata.
    #[must_use]
    pub(crate) fn export_entries(&self, start: Option<u64>, end: Option<u64>) -> (Vec<ImmutableAuditEntry>, Option<String>) {
        let entries = self.range(start, end);
        let leaves: Vec<String> = entries.iter().map(|entry| entry.entry_hash.clone()).collect();
        let root = merkle::merkle_root(&leaves);
        (entries, root)
    }
}

/// The result of [`AuditChain::merkle_proof`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerkleProofResult {
    /// Hash of the requested leaf entry.
    pub entry_hash: String,
    /// Sibling hashes and sides from leaf to root.
    pub proof_path: Vec<ProofStep>,
    /// Root the proof reconstructs to, if the chain is non-empty.
    pub merkle_root: Option<String>,
}

/// Multi-tenant registry of [`AuditChain`]s.
#[derive(Debug, Default)]
pub struct AuditStore {
    chains: Mutex<HashMap<TenantId, std::sync::Arc<AuditChain>>>,
}

impl AuditStore {
    /// Builds an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns (creating if necessary) the chain for `tenant`.
    #[must_use]
    pub fn chain_for(&self, tenant: &TenantId) -> std::sync::Arc<AuditChain> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut chains = self.chains.lock().unwrap();
        chains.entry(tenant.clone()).or_insert_with(|| std::sync::Arc::new(AuditChain::new())).clone()
    }

    /// Rebuilds a store from a snapshot of each tenant's entries (e.g. a
    /// `gov-cli` session file), restoring every chain via
    /// [`AuditChain::from_entries`].
    #[must_use]
    pub fn from_snapshot(snapshot: HashMap<TenantId, Vec<ImmutableAuditEntry>>) -> Self {
        let chains = snapshot
            .into_iter()
            .map(|(tenant, entries)| (tenant, std::sync::Arc::new(AuditChain::from_entries(entries))))
            .collect();
        Self { chains: Mutex::new(chains) }
    }

    /// Captures every tenant's entries for persisting to a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<TenantId, Vec<ImmutableAuditEntry>> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let chains = self.chains.lock().unwrap();
        chains.iter().map(|(tenant, chain)| (tenant.clone(), chain.snapshot_entries())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::AuditChain;
    use crate::filter::AuditFilter;
    use gov_core::ActorType;
    use gov_core::domain::audit::AuditEntry;

    fn entry(action: &str) -> AuditEntry {
        AuditEntry::new("alice", ActorType::Human, action, "report_catalog", "cat-1")
    }

    #[test]
    fn first_entry_chains_from_genesis() {
        let chain = AuditChain::new();
        let appended = chain.append(entry("submit")).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(appended.sequence_number, 0);
        assert_eq!(appended.previous_hash, crate::hashing::GENESIS_HASH);
    }

    #[test]
    fn sequence_numbers_increase_without_gaps() {
        let chain = AuditChain::new();
        for i in 0..5 {
            let appended = chain.append(entry("act")).unwrap_or_else(|err| panic!("{err}"));
            assert_eq!(appended.sequence_number, i);
        }
    }

    #[test]
    fn verify_chain_passes_on_untouched_chain() {
        let chain = AuditChain::new();
        for _ in 0..10 {
            chain.append(entry("act")).unwrap_or_else(|err| panic!("{err}"));
        }
        let verification = chain.verify_chain(None, None);
        assert!(verification.is_valid);
        assert!(verification.merkle_root.is_some());
    }

    #[test]
    fn tampering_an_entry_is_detected_by_hash_mismatch() {
        let chain = AuditChain::new();
        for _ in 0..10 {
            chain.append(entry("act")).unwrap_or_else(|err| panic!("{err}"));
        }
        {
            #[allow(clippy::unwrap_used, reason = "test-only direct state mutation to simulate tampering")]
            let mut state = chain.state.lock().unwrap();
            state.entries[5].entry.action = "tampered".to_string();
        }
        let verification = chain.verify_chain(None, None);
        assert!(!verification.is_valid);
        assert_eq!(verification.first_invalid_sequence, Some(5));
        assert_eq!(verification.error.as_deref(), Some("hash_tampered"));
    }

    #[test]
    fn breaking_the_previous_hash_link_is_detected_as_chain_broken() {
        let chain = AuditChain::new();
        for _ in 0..5 {
            chain.append(entry("act")).unwrap_or_else(|err| panic!("{err}"));
        }
        {
            #[allow(clippy::unwrap_used, reason = "test-only direct state mutation to simulate corruption")]
            let mut state = chain.state.lock().unwrap();
            state.entries[3].previous_hash = "deadbeef".repeat(8);
        }
        let verification = chain.verify_chain(None, None);
        assert!(!verification.is_valid);
        assert_eq!(verification.error.as_deref(), Some("chain_broken"));
    }

    #[test]
    fn out_of_range_end_clamps_instead_of_erroring() {
        let chain = AuditChain::new();
        for _ in 0..3 {
            chain.append(entry("act")).unwrap_or_else(|err| panic!("{err}"));
        }
        let verification = chain.verify_chain(Some(0), Some(999));
        assert!(verification.is_valid);
    }

    #[test]
    fn start_after_end_is_trivially_valid_and_empty() {
        let chain = AuditChain::new();
        for _ in 0..3 {
            chain.append(entry("act")).unwrap_or_else(|err| panic!("{err}"));
        }
        let verification = chain.verify_chain(Some(2), Some(0));
        assert!(verification.is_valid);
        assert!(verification.merkle_root.is_none());
    }

    #[test]
    fn list_entries_returns_most_recent_first() {
        let chain = AuditChain::new();
        chain.append(entry("first")).unwrap_or_else(|err| panic!("{err}"));
        chain.append(entry("second")).unwrap_or_else(|err| panic!("{err}"));
        chain.append(entry("third")).unwrap_or_else(|err| panic!("{err}"));
        let entries = chain.list_entries(&AuditFilter::default());
        let actions: Vec<&str> = entries.iter().map(|e| e.entry.action.as_str()).collect();
        assert_eq!(actions, vec!["third", "second", "first"]);
    }

    #[test]
    fn chain_restored_from_entries_resumes_sequence_and_verifies() {
        let original = AuditChain::new();
        for action in ["first", "second", "third"] {
            original.append(entry(action)).unwrap_or_else(|err| panic!("{err}"));
        }
        let snapshot = original.snapshot_entries();

        let restored = AuditChain::from_entries(snapshot);
        assert_eq!(restored.entry_count(), 3);
        assert!(restored.verify_chain(None, None).is_valid);

        let appended = restored.append(entry("fourth")).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(appended.sequence_number, 3);
        assert!(restored.verify_chain(None, None).is_valid);
    }

    #[test]
    fn store_round_trips_through_snapshot() {
        use super::AuditStore;
        use gov_core::identifiers::TenantId;

        let store = AuditStore::new();
        let tenant = TenantId::new("t1");
        store.chain_for(&tenant).append(entry("create_issue")).unwrap_or_else(|err| panic!("{err}"));

        let snapshot = store.snapshot();
        let restored = AuditStore::from_snapshot(snapshot);
        assert_eq!(restored.chain_for(&tenant).entry_count(), 1);
    }
}
