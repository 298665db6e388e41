//! Claim envelope codec.
//!
//! A [`PackagedClaim`] is the wire/storage form of an encrypted claim: the
//! claim identifier in cleartext (for indexing) and an authenticated
//! envelope holding everything else. Envelopes always carry their
//! algorithm identifiers in a protected header; the identifiers are fixed
//! constants so stored data cannot be downgraded to a weaker suite.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{PrivateKeyInput, PublicKeyInput, SymmetricKey, KEY_SIZE};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, AeadCore, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, KeyInit};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use serde::{Deserialize, Serialize};

/// Key-management algorithm for asymmetric envelopes.
pub const ALG: &str = "ECDH-ES+X25519";
/// Content-encryption algorithm for asymmetric envelopes.
pub const ENC: &str = "XSalsa20-Poly1305";
/// Key-management algorithm for symmetric envelopes (direct shared key).
pub const SYMMETRIC_ALG: &str = "dir";
/// Content-encryption algorithm for symmetric envelopes.
pub const SYMMETRIC_ENC: &str = "ChaCha20-Poly1305";

const XSALSA_NONCE_SIZE: usize = 24;
const CHACHA_NONCE_SIZE: usize = 12;

/// Algorithm identifiers protected alongside the ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedHeader {
    pub alg: String,
    pub enc: String,
}

/// The encrypted claim container. Binary fields are base64 in the
/// canonical JSON form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEnvelope {
    pub protected: ProtectedHeader,
    /// Present only for asymmetric envelopes (sender side of the DH).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral_public_key: Option<String>,
    pub nonce: String,
    pub ciphertext: String,
}

/// Wire/storage representation of an encrypted claim.
///
/// Only `claim_id` is cleartext; reading it never requires decryption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedClaim {
    pub claim_id: String,
    pub claim: ClaimEnvelope,
}

impl PackagedClaim {
    /// Canonical textual (JSON) form, as written to the object store.
    pub fn as_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Structured mapping form for in-memory inspection.
    pub fn as_value(&self) -> CryptoResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Encrypts a plaintext claim for an X25519 public key.
pub struct AsymmetricClaimEncryptor {
    claim: serde_json::Value,
    claim_id: String,
    public_key: PublicKey,
}

impl AsymmetricClaimEncryptor {
    /// The claim must be a JSON object with a string `"id"` field. The key
    /// is accepted as a native key object, raw/armored bytes, or text.
    pub fn new(claim: serde_json::Value, key: impl Into<PublicKeyInput>) -> CryptoResult<Self> {
        let claim_id = claim_id_of(&claim)?;
        let public_key = key.into().into_public_key()?;
        Ok(Self {
            claim,
            claim_id,
            public_key,
        })
    }

    pub fn protected_header(&self) -> ProtectedHeader {
        ProtectedHeader {
            alg: ALG.to_string(),
            enc: ENC.to_string(),
        }
    }

    /// Packages the claim under a fresh ephemeral key and nonce.
    pub fn packaged_claim(&self) -> CryptoResult<PackagedClaim> {
        let plaintext = serde_json::to_vec(&self.claim)?;
        let envelope = seal_asymmetric(&plaintext, &self.public_key)?;
        Ok(PackagedClaim {
            claim_id: self.claim_id.clone(),
            claim: envelope,
        })
    }
}

/// Decrypts an asymmetric envelope with the matching X25519 private key.
pub struct AsymmetricClaimDecryptor {
    packaged: PackagedClaim,
    secret_key: SecretKey,
}

impl AsymmetricClaimDecryptor {
    pub fn new(envelope_text: &str, key: impl Into<PrivateKeyInput>) -> CryptoResult<Self> {
        let packaged = PackagedClaim::from_json(envelope_text)
            .map_err(|e| CryptoError::Decryption(format!("malformed envelope: {e}")))?;
        let secret_key = key.into().into_secret_key()?;
        Ok(Self {
            packaged,
            secret_key,
        })
    }

    /// The cleartext claim identifier, readable without decryption.
    pub fn claim_id(&self) -> &str {
        &self.packaged.claim_id
    }

    pub fn decrypt(&self) -> CryptoResult<serde_json::Value> {
        let plaintext = open_asymmetric(&self.packaged.claim, &self.secret_key)?;
        parse_plaintext(&plaintext)
    }
}

/// Encrypts a plaintext claim under a shared symmetric key.
pub struct SymmetricClaimEncryptor {
    claim: serde_json::Value,
    claim_id: String,
    key: SymmetricKey,
}

impl SymmetricClaimEncryptor {
    pub fn new(claim: serde_json::Value, key: SymmetricKey) -> CryptoResult<Self> {
        let claim_id = claim_id_of(&claim)?;
        Ok(Self {
            claim,
            claim_id,
            key,
        })
    }

    pub fn protected_header(&self) -> ProtectedHeader {
        ProtectedHeader {
            alg: SYMMETRIC_ALG.to_string(),
            enc: SYMMETRIC_ENC.to_string(),
        }
    }

    pub fn packaged_claim(&self) -> CryptoResult<PackagedClaim> {
        let plaintext = serde_json::to_vec(&self.claim)?;
        let envelope = seal_symmetric(&plaintext, &self.key)?;
        Ok(PackagedClaim {
            claim_id: self.claim_id.clone(),
            claim: envelope,
        })
    }
}

/// Decrypts a symmetric envelope with the matching shared key.
pub struct SymmetricClaimDecryptor {
    packaged: PackagedClaim,
    key: SymmetricKey,
}

impl SymmetricClaimDecryptor {
    pub fn new(envelope_text: &str, key: SymmetricKey) -> CryptoResult<Self> {
        let packaged = PackagedClaim::from_json(envelope_text)
            .map_err(|e| CryptoError::Decryption(format!("malformed envelope: {e}")))?;
        Ok(Self { packaged, key })
    }

    pub fn claim_id(&self) -> &str {
        &self.packaged.claim_id
    }

    pub fn decrypt(&self) -> CryptoResult<serde_json::Value> {
        let plaintext = open_symmetric(&self.packaged.claim, &self.key)?;
        parse_plaintext(&plaintext)
    }
}

fn claim_id_of(claim: &serde_json::Value) -> CryptoResult<String> {
    claim
        .as_object()
        .and_then(|map| map.get("id"))
        .and_then(|id| id.as_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            CryptoError::InvalidClaim(
                "claim must be a JSON object with a string \"id\" field".to_string(),
            )
        })
}

fn parse_plaintext(plaintext: &[u8]) -> CryptoResult<serde_json::Value> {
    serde_json::from_slice(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("decrypted payload is not valid JSON: {e}")))
}

fn seal_asymmetric(plaintext: &[u8], recipient: &PublicKey) -> CryptoResult<ClaimEnvelope> {
    let ephemeral = SecretKey::generate(&mut OsRng);
    let salsa_box = SalsaBox::new(recipient, &ephemeral);
    let nonce = SalsaBox::generate_nonce(&mut OsRng);

    let ciphertext = salsa_box
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(format!("envelope seal failed: {e}")))?;

    Ok(ClaimEnvelope {
        protected: ProtectedHeader {
            alg: ALG.to_string(),
            enc: ENC.to_string(),
        },
        ephemeral_public_key: Some(BASE64.encode(ephemeral.public_key().as_bytes())),
        nonce: BASE64.encode(nonce),
        ciphertext: BASE64.encode(&ciphertext),
    })
}

fn open_asymmetric(envelope: &ClaimEnvelope, secret_key: &SecretKey) -> CryptoResult<Vec<u8>> {
    if envelope.protected.alg != ALG || envelope.protected.enc != ENC {
        return Err(CryptoError::Decryption(format!(
            "unexpected algorithm identifiers: {}/{}",
            envelope.protected.alg, envelope.protected.enc
        )));
    }
    let ephemeral = envelope.ephemeral_public_key.as_deref().ok_or_else(|| {
        CryptoError::Decryption("envelope is missing its ephemeral public key".to_string())
    })?;
    let ephemeral: [u8; KEY_SIZE] = decode_exact("ephemeral_public_key", ephemeral)?;
    let nonce: [u8; XSALSA_NONCE_SIZE] = decode_exact("nonce", &envelope.nonce)?;
    let ciphertext = decode_field("ciphertext", &envelope.ciphertext)?;

    let salsa_box = SalsaBox::new(&PublicKey::from(ephemeral), secret_key);
    salsa_box
        .decrypt(&crypto_box::Nonce::from(nonce), ciphertext.as_ref())
        .map_err(|_| CryptoError::Decryption("wrong key or tampered envelope".to_string()))
}

pub(crate) fn seal_symmetric(plaintext: &[u8], key: &SymmetricKey) -> CryptoResult<ClaimEnvelope> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(format!("envelope seal failed: {e}")))?;

    Ok(ClaimEnvelope {
        protected: ProtectedHeader {
            alg: SYMMETRIC_ALG.to_string(),
            enc: SYMMETRIC_ENC.to_string(),
        },
        ephemeral_public_key: None,
        nonce: BASE64.encode(nonce),
        ciphertext: BASE64.encode(&ciphertext),
    })
}

pub(crate) fn open_symmetric(
    envelope: &ClaimEnvelope,
    key: &SymmetricKey,
) -> CryptoResult<Vec<u8>> {
    if envelope.protected.alg != SYMMETRIC_ALG || envelope.protected.enc != SYMMETRIC_ENC {
        return Err(CryptoError::Decryption(format!(
            "unexpected algorithm identifiers: {}/{}",
            envelope.protected.alg, envelope.protected.enc
        )));
    }
    let nonce: [u8; CHACHA_NONCE_SIZE] = decode_exact("nonce", &envelope.nonce)?;
    let ciphertext = decode_field("ciphertext", &envelope.ciphertext)?;

    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    cipher
        .decrypt(&chacha20poly1305::Nonce::from(nonce), ciphertext.as_ref())
        .map_err(|_| CryptoError::Decryption("wrong key or tampered envelope".to_string()))
}

fn decode_field(field: &str, value: &str) -> CryptoResult<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| CryptoError::Decryption(format!("invalid base64 in {field}: {e}")))
}

fn decode_exact<const N: usize>(field: &str, value: &str) -> CryptoResult<[u8; N]> {
    decode_field(field, value)?
        .try_into()
        .map_err(|_| CryptoError::Decryption(format!("unexpected length for {field}")))
}
