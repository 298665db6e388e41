//! Key material for the envelope codec.
//!
//! Keys are opaque value types: a 256-bit symmetric secret and an X25519
//! keypair. Both are immutable once constructed and safe to share across
//! concurrent encrypt/decrypt calls. Asymmetric keys are accepted in a
//! closed set of input encodings (native object, raw or armored bytes,
//! base64 or armored string) and normalized at construction time.

use crate::error::{CryptoError, CryptoResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chacha20poly1305::aead::OsRng;
use chacha20poly1305::{ChaCha20Poly1305, KeyInit};
use crypto_box::{PublicKey, SecretKey};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// All key material is 32 bytes.
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric encryption key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        let key = ChaCha20Poly1305::generate_key(&mut OsRng);
        Self(key.into())
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        Ok(Self(decode_key_text(text)?))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// X25519 keypair for asymmetric claim envelopes.
///
/// The public key is used only for encryption, the secret key only for
/// decryption. The secret key zeroizes on drop (from crypto_box).
pub struct ClaimKeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl ClaimKeyPair {
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Reconstructs a keypair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn public_bytes(&self) -> [u8; KEY_SIZE] {
        *self.public.as_bytes()
    }

    pub fn secret_bytes(&self) -> [u8; KEY_SIZE] {
        self.secret.to_bytes()
    }

    /// The public key in its textual (base64) encoding.
    pub fn public_key_text(&self) -> String {
        BASE64.encode(self.public.as_bytes())
    }

    /// The secret key in its textual (base64) encoding.
    pub fn secret_key_text(&self) -> String {
        BASE64.encode(self.secret.to_bytes())
    }
}

/// Accepted encodings for an encryption (public) key.
pub enum PublicKeyInput {
    Key(PublicKey),
    /// Raw 32 bytes, or the UTF-8 bytes of an armored/base64 text form.
    Bytes(Vec<u8>),
    /// Base64, optionally wrapped in PEM-style armor lines.
    Text(String),
}

impl PublicKeyInput {
    pub(crate) fn into_public_key(self) -> CryptoResult<PublicKey> {
        match self {
            PublicKeyInput::Key(key) => Ok(key),
            PublicKeyInput::Bytes(bytes) => Ok(PublicKey::from(normalize_key_bytes(bytes)?)),
            PublicKeyInput::Text(text) => Ok(PublicKey::from(decode_key_text(&text)?)),
        }
    }
}

impl From<PublicKey> for PublicKeyInput {
    fn from(key: PublicKey) -> Self {
        PublicKeyInput::Key(key)
    }
}

impl From<&PublicKey> for PublicKeyInput {
    fn from(key: &PublicKey) -> Self {
        PublicKeyInput::Key(key.clone())
    }
}

impl From<[u8; KEY_SIZE]> for PublicKeyInput {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        PublicKeyInput::Bytes(bytes.to_vec())
    }
}

impl From<&[u8]> for PublicKeyInput {
    fn from(bytes: &[u8]) -> Self {
        PublicKeyInput::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PublicKeyInput {
    fn from(bytes: Vec<u8>) -> Self {
        PublicKeyInput::Bytes(bytes)
    }
}

impl From<&str> for PublicKeyInput {
    fn from(text: &str) -> Self {
        PublicKeyInput::Text(text.to_string())
    }
}

impl From<String> for PublicKeyInput {
    fn from(text: String) -> Self {
        PublicKeyInput::Text(text)
    }
}

/// Accepted encodings for a decryption (private) key.
pub enum PrivateKeyInput {
    Key(SecretKey),
    Bytes(Vec<u8>),
    Text(String),
}

impl PrivateKeyInput {
    pub(crate) fn into_secret_key(self) -> CryptoResult<SecretKey> {
        match self {
            PrivateKeyInput::Key(key) => Ok(key),
            PrivateKeyInput::Bytes(bytes) => Ok(SecretKey::from(normalize_key_bytes(bytes)?)),
            PrivateKeyInput::Text(text) => Ok(SecretKey::from(decode_key_text(&text)?)),
        }
    }
}

impl From<SecretKey> for PrivateKeyInput {
    fn from(key: SecretKey) -> Self {
        PrivateKeyInput::Key(key)
    }
}

impl From<&SecretKey> for PrivateKeyInput {
    fn from(key: &SecretKey) -> Self {
        PrivateKeyInput::Key(key.clone())
    }
}

impl From<[u8; KEY_SIZE]> for PrivateKeyInput {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        PrivateKeyInput::Bytes(bytes.to_vec())
    }
}

impl From<&[u8]> for PrivateKeyInput {
    fn from(bytes: &[u8]) -> Self {
        PrivateKeyInput::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PrivateKeyInput {
    fn from(bytes: Vec<u8>) -> Self {
        PrivateKeyInput::Bytes(bytes)
    }
}

impl From<&str> for PrivateKeyInput {
    fn from(text: &str) -> Self {
        PrivateKeyInput::Text(text.to_string())
    }
}

impl From<String> for PrivateKeyInput {
    fn from(text: String) -> Self {
        PrivateKeyInput::Text(text)
    }
}

/// Raw 32 bytes pass through; anything else must be the UTF-8 bytes of a
/// textual key form.
fn normalize_key_bytes(bytes: Vec<u8>) -> CryptoResult<[u8; KEY_SIZE]> {
    if bytes.len() == KEY_SIZE {
        let mut out = [0u8; KEY_SIZE];
        out.copy_from_slice(&bytes);
        return Ok(out);
    }
    let text = String::from_utf8(bytes).map_err(|_| {
        CryptoError::InvalidKeyEncoding(
            "key bytes are neither raw 32 bytes nor UTF-8 text".to_string(),
        )
    })?;
    decode_key_text(&text)
}

/// Decodes a textual key: base64, with any PEM-style armor lines stripped.
fn decode_key_text(text: &str) -> CryptoResult<[u8; KEY_SIZE]> {
    let body: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("-----"))
        .map(str::trim)
        .collect();
    let bytes = BASE64
        .decode(body.as_bytes())
        .map_err(|e| CryptoError::InvalidKeyEncoding(format!("invalid base64 key text: {e}")))?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armored_key_text_decodes() {
        let kp = ClaimKeyPair::generate();
        let armored = format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
            kp.public_key_text()
        );
        let key = PublicKeyInput::from(armored.as_str())
            .into_public_key()
            .unwrap();
        assert_eq!(key.as_bytes(), kp.public.as_bytes());
    }

    #[test]
    fn short_key_rejected() {
        let err = SymmetricKey::from_slice(&[0u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 16
            }
        ));
    }
}
