//! Envelope encryption layer for claim payloads.
//!
//! Converts plaintext claim records (JSON objects with a string `"id"`)
//! into authenticated, encrypted envelopes and back:
//!
//! - **Asymmetric**: ephemeral X25519 key exchange + XSalsa20-Poly1305.
//!   The public key encrypts, the private key decrypts.
//! - **Symmetric**: ChaCha20-Poly1305 under a shared 256-bit key.
//!
//! Only the claim identifier stays in cleartext; every other field lives
//! inside the envelope. Each encryption draws fresh per-message entropy,
//! so two envelopes of the same plaintext never compare equal.
//!
//! Key rotation is supported two ways: [`SymmetricKeyRotator`] re-encrypts
//! an envelope under a new key without handing plaintext to the caller,
//! and [`RotatableSymmetricClaimDecryptor`] reads data written under any
//! key in an ordered multi-generation list.

mod envelope;
mod error;
mod key;
mod rotation;

pub use envelope::{
    AsymmetricClaimDecryptor, AsymmetricClaimEncryptor, ClaimEnvelope, PackagedClaim,
    ProtectedHeader, SymmetricClaimDecryptor, SymmetricClaimEncryptor, ALG, ENC, SYMMETRIC_ALG,
    SYMMETRIC_ENC,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{ClaimKeyPair, PrivateKeyInput, PublicKeyInput, SymmetricKey, KEY_SIZE};
pub use rotation::{RotatableSymmetricClaimDecryptor, SymmetricKeyRotator};
