// crates/gov-audit/src/merkle.rs
// ============================================================================
// Module: Merkle Tree
// Description: Binary Merkle tree over leaf entry hashes with odd-node
//              self-duplication, per §9 Design Notes (differs from RFC 6962
//              on purpose — this choice must be preserved for export
//              compatibility).
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::hashing::hash_pair;

/// Which side of a node a Merkle proof's sibling hash sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The sibling combines as the left operand: `hash(sibling || node)`.
    Left,
    /// The sibling combines as the right operand: `hash(node || sibling)`.
    Right,
}

/// One step of a Merkle inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Hash of the sibling node at this level.
    pub sibling_hash: String,
    /// Which side the sibling sits on.
    pub side: Side,
}

/// Computes the Merkle root over `leaves` (already-hashed entry hashes, in
/// sequence order). Odd nodes at a level are duplicated and hashed with
/// themselves rather than promoted unpaired. Returns `None` for an empty
/// input.
#[must_use]
pub fn merkle_root(leaves: &[String]) -> Option<String> {
    if leaves.is_empty() {
        return None;
    }
    let mut level: Vec<String> = leaves.to_vec();
    while level.len() > 1 {
        level = combine_level(&level);
    }
    level.into_iter().next()
}

/// Builds the inclusion proof for the leaf at `index` within `leaves`.
///
/// Returns `None` if `index` is out of range.
#[must_use]
pub fn merkle_proof(leaves: &[String], index: usize) -> Option<Vec<ProofStep>> {
    if index >= leaves.len() {
        return None;
    }
    let mut level: Vec<String> = leaves.to_vec();
    let mut position = index;
    let mut proof = Vec::new();

    while level.len() > 1 {
        let padded = pad_odd(&level);
        let sibling_index = position ^ 1;
        let side = if position % 2 == 0 { Side::Right } else { Side::Left };
        proof.push(ProofStep {
            sibling_hash: padded[sibling_index].clone(),
            side,
        });
        level = combine_padded(&padded);
        position /= 2;
    }

    Some(proof)
}

/// Recomputes a Merkle root from a leaf hash and its inclusion proof.
#[must_use]
pub fn verify_proof(leaf_hash: &str, proof: &[ProofStep]) -> String {
    let mut current = leaf_hash.to_string();
    for step in proof {
        current = match step.side {
            Side::Left => hash_pair(&step.sibling_hash, &current),
            Side::Right => hash_pair(&current, &step.sibling_hash),
        };
    }
    current
}

/// Duplicates the last node if `level` has odd length.
fn pad_odd(level: &[String]) -> Vec<String> {
    let mut padded = level.to_vec();
    if padded.len() % 2 != 0 {
        #[allow(clippy::unwrap_used, reason = "padded is non-empty: merkle_root/merkle_proof never call this on an empty level")]
        let last = padded.last().unwrap().clone();
        padded.push(last);
    }
    padded
}

/// Combines one level into the next, padding for odd length first.
fn combine_level(level: &[String]) -> Vec<String> {
    combine_padded(&pad_odd(level))
}

/// Combines an already-even-length level into the next level up.
fn combine_padded(padded: &[String]) -> Vec<String> {
    padded.chunks(2).map(|pair| hash_pair(&pair[0], &pair[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::merkle_proof;
    use super::merkle_root;
    use super::verify_proof;
    use crate::hashing::hash_hex;

    fn leaves(n: usize) -> Vec<String> {
        (0..n).map(|i| hash_hex(format!("leaf-{i}").as_bytes())).collect()
    }

    #[test]
    fn empty_has_no_root() {
        assert!(merkle_root(&[]).is_none());
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let leaves = leaves(1);
        assert_eq!(merkle_root(&leaves), Some(leaves[0].clone()));
    }

    #[test]
    fn odd_leaf_count_duplicates_last_node() {
        let leaves = leaves(3);
        let root = merkle_root(&leaves);
        assert!(root.is_some());
    }

    #[test]
    fn every_leaf_proof_recomputes_the_root() {
        let leaves = leaves(7);
        let root = merkle_root(&leaves).unwrap_or_default();
        for (index, leaf) in leaves.iter().enumerate() {
            let proof = merkle_proof(&leaves, index).unwrap_or_default();
            let recomputed = verify_proof(leaf, &proof);
            assert_eq!(recomputed, root, "leaf {index} proof mismatch");
        }
    }

    #[test]
    fn out_of_range_index_has_no_proof() {
        let leaves = leaves(3);
        assert!(merkle_proof(&leaves, 99).is_none());
    }
}
