//! Signature verification used for commit votes.

use ed25519_dalek::{Signature, VerifyingKey};

/// Verifies a validator's signature over vote sign bytes.
#[allow(clippy::module_name_repetitions)]
pub trait SignatureVerifier {
    /// Returns true if `signature` is a valid signature of `message` by `public_key`.
    fn verify_signature(&self, public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool;
}

/// Strict ed25519 verification, rejecting small-order keys and non-canonical signatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify_signature(&self, public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };

        key.verify_strict(message, &signature).is_ok()
    }
}
