//! Symmetric key rotation.
//!
//! Rotation never hands plaintext to the caller: the envelope is opened
//! and resealed entirely inside [`SymmetricKeyRotator::rotate`]. Online
//! rotation is supported by [`RotatableSymmetricClaimDecryptor`], which
//! reads envelopes written under any key in an ordered multi-generation
//! list while new writes use only the newest key.

use crate::envelope::{open_symmetric, seal_symmetric, PackagedClaim};
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;

/// Re-encrypts claim envelopes from an old symmetric key to a new one.
pub struct SymmetricKeyRotator {
    old_key: SymmetricKey,
    new_key: SymmetricKey,
}

impl SymmetricKeyRotator {
    pub fn new(old_key: SymmetricKey, new_key: SymmetricKey) -> Self {
        Self { old_key, new_key }
    }

    /// Opens the envelope with the old key and reseals it with the new
    /// key, preserving the claim identifier.
    ///
    /// The fresh nonce guarantees the rotated envelope never compares
    /// equal to its input, even when both keys are identical. Fails with
    /// a decryption error when the old key cannot open the input.
    pub fn rotate(&self, packaged: &PackagedClaim) -> CryptoResult<PackagedClaim> {
        let plaintext = open_symmetric(&packaged.claim, &self.old_key)?;
        let envelope = seal_symmetric(&plaintext, &self.new_key)?;
        Ok(PackagedClaim {
            claim_id: packaged.claim_id.clone(),
            claim: envelope,
        })
    }
}

/// Trial-decrypts an envelope against an ordered list of candidate keys.
///
/// Keys are tried in the given order with early exit on the first
/// success. Per-key failures are not surfaced; exhausting the list yields
/// a single [`CryptoError::NoUsableKey`].
pub struct RotatableSymmetricClaimDecryptor {
    packaged: PackagedClaim,
    keys: Vec<SymmetricKey>,
}

impl RotatableSymmetricClaimDecryptor {
    pub fn new(envelope_text: &str, keys: Vec<SymmetricKey>) -> CryptoResult<Self> {
        let packaged = PackagedClaim::from_json(envelope_text)
            .map_err(|e| CryptoError::Decryption(format!("malformed envelope: {e}")))?;
        Ok(Self { packaged, keys })
    }

    pub fn claim_id(&self) -> &str {
        &self.packaged.claim_id
    }

    pub fn decrypt(&self) -> CryptoResult<serde_json::Value> {
        for key in &self.keys {
            if let Ok(plaintext) = open_symmetric(&self.packaged.claim, key) {
                return serde_json::from_slice(&plaintext).map_err(|e| {
                    CryptoError::Decryption(format!("decrypted payload is not valid JSON: {e}"))
                });
            }
        }
        Err(CryptoError::NoUsableKey {
            tried: self.keys.len(),
        })
    }
}
