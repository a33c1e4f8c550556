//! ICS-23 membership and non-membership verification of chained Merkle proofs.
//!
//! A proof holds one commitment proof per store, innermost first. Each proof's root is the
//! value proven in the next store, and the outermost root must equal the consensus state root.

use ics23::{commitment_proof::Proof, CommitmentProof, ExistenceProof, HostFunctionsManager};
use light_client_utils::ensure;
use prost::Message;

use crate::{client_state::ProofSpec, error::TendermintClientError};

/// A chained Merkle proof, innermost store first
#[derive(Clone, PartialEq, Message)]
pub struct MerkleProof {
    /// The commitment proofs
    #[prost(message, repeated, tag = "1")]
    pub proofs: Vec<CommitmentProof>,
}

impl MerkleProof {
    /// Decodes a protobuf encoded proof.
    /// # Errors
    /// Returns an error if the bytes are not a valid proof.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, TendermintClientError> {
        Self::decode(bytes).map_err(|e| TendermintClientError::MerkleProofDecode(e.to_string()))
    }
}

/// Verifies that `value` is stored at `path` under `root`.
/// # Errors
/// Returns an error if the proof cannot be decoded, its shape does not match the proof specs
/// and path, or it does not verify.
pub fn verify_membership(
    proof_specs: &[ProofSpec],
    root: &[u8; 32],
    proof: &[u8],
    path: &[Vec<u8>],
    value: &[u8],
) -> Result<(), TendermintClientError> {
    let proof = MerkleProof::decode_bytes(proof)?;
    check_lengths(proof_specs, &proof, path)?;
    ensure!(
        !value.is_empty(),
        TendermintClientError::MembershipVerificationFailed
    );

    verify_chained_membership(proof_specs, root, &proof.proofs, path, value.to_vec(), 0)
}

/// Verifies that nothing is stored at `path` under `root`.
/// # Errors
/// Returns an error if the proof cannot be decoded, its shape does not match the proof specs
/// and path, or it does not verify.
pub fn verify_non_membership(
    proof_specs: &[ProofSpec],
    root: &[u8; 32],
    proof: &[u8],
    path: &[Vec<u8>],
) -> Result<(), TendermintClientError> {
    let proof = MerkleProof::decode_bytes(proof)?;
    check_lengths(proof_specs, &proof, path)?;

    let (innermost, spec, key) = match (proof.proofs.first(), proof_specs.first(), path.last()) {
        (Some(innermost), Some(spec), Some(key)) => (innermost, spec, key),
        _ => return Err(TendermintClientError::NonMembershipVerificationFailed),
    };
    let Some(Proof::Nonexist(non_existence)) = &innermost.proof else {
        return Err(TendermintClientError::NonMembershipVerificationFailed);
    };

    let existence = non_existence
        .left
        .as_ref()
        .or(non_existence.right.as_ref())
        .ok_or(TendermintClientError::NonMembershipVerificationFailed)?;
    let subroot = existence_root(existence)?;

    ensure!(
        ics23::verify_non_membership::<HostFunctionsManager>(
            innermost,
            &spec.to_ics23(),
            &subroot,
            key,
        ),
        TendermintClientError::NonMembershipVerificationFailed
    );

    verify_chained_membership(proof_specs, root, &proof.proofs, path, subroot, 1)
        .map_err(|_| TendermintClientError::NonMembershipVerificationFailed)
}

/// Verifies the existence proofs from index `start` on, each proving the previous root under
/// the next key, and checks the final root.
fn verify_chained_membership(
    proof_specs: &[ProofSpec],
    root: &[u8; 32],
    proofs: &[CommitmentProof],
    path: &[Vec<u8>],
    value: Vec<u8>,
    start: usize,
) -> Result<(), TendermintClientError> {
    let mut value = value;
    for (index, (proof, spec)) in proofs.iter().zip(proof_specs).enumerate().skip(start) {
        let Some(Proof::Exist(existence)) = &proof.proof else {
            return Err(TendermintClientError::MembershipVerificationFailed);
        };
        let subroot = existence_root(existence)?;
        let key = &path[path.len() - 1 - index];

        ensure!(
            ics23::verify_membership::<HostFunctionsManager>(
                proof,
                &spec.to_ics23(),
                &subroot,
                key,
                &value,
            ),
            TendermintClientError::MembershipVerificationFailed
        );
        value = subroot;
    }

    ensure!(
        value.as_slice() == root.as_slice(),
        TendermintClientError::MembershipVerificationFailed
    );
    Ok(())
}

fn existence_root(existence: &ExistenceProof) -> Result<Vec<u8>, TendermintClientError> {
    ics23::calculate_existence_root::<HostFunctionsManager>(existence)
        .map_err(|e| TendermintClientError::InvalidCommitmentProof(e.to_string()))
}

fn check_lengths(
    proof_specs: &[ProofSpec],
    proof: &MerkleProof,
    path: &[Vec<u8>],
) -> Result<(), TendermintClientError> {
    ensure!(
        proof.proofs.len() == proof_specs.len(),
        TendermintClientError::InvalidPathLength {
            expected: proof_specs.len(),
            found: proof.proofs.len(),
        }
    );
    ensure!(
        path.len() == proof_specs.len(),
        TendermintClientError::InvalidPathLength {
            expected: proof_specs.len(),
            found: path.len(),
        }
    );
    Ok(())
}
