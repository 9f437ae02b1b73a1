//! Password-based key envelope: derivation plus authenticated encryption.
//!
//! A [`DerivedKey`] is obtained from a password and salt via Argon2id and
//! seals the raw account-index key with AES-128-GCM. The salt, ciphertext,
//! and IV together form the stored envelope; the derived key itself is never
//! persisted.

use crate::constants::{argon2_params, IV_SIZE, KEY_STRENGTH};
use crate::errors::{CryptoError, Result};
use crate::random::random_bytes;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use argon2::{Algorithm, Argon2};
use zeroize::Zeroizing;

/// AES-128-GCM key size in bytes
const CIPHER_KEY_SIZE: usize = 16;

/// Sealed key material produced by [`DerivedKey::encrypt`].
///
/// The IV is only valid paired with its own ciphertext; every encryption
/// draws a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEnvelope {
    /// Ciphertext with the 16-byte authentication tag appended
    pub cipherbytes: Vec<u8>,
    /// Per-encryption nonce
    pub iv: Vec<u8>,
}

/// Symmetric key derived from a password and salt.
///
/// Zeroized on drop. Never log or persist the key bytes.
pub struct DerivedKey {
    key: Zeroizing<Vec<u8>>,
}

/// Derive a symmetric key from a password and salt using Argon2id.
///
/// # Arguments
///
/// * `password` - The password bytes
/// * `salt` - Random salt of [`crate::KEY_SALT_SIZE`] bytes
/// * `strength` - Derived-key strength in bits; the output length is
///   `strength / 8` bytes. Callers pass [`KEY_STRENGTH`].
pub fn derive_key(password: &[u8], salt: &[u8], strength: u32) -> Result<DerivedKey> {
    let output_len = (strength / 8) as usize;

    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        argon2_params::VERSION,
        argon2_params::get_params(output_len),
    );

    let mut key = Zeroizing::new(vec![0u8; output_len]);
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;

    Ok(DerivedKey { key })
}

impl DerivedKey {
    /// Encrypt a raw key under this derived key.
    ///
    /// Generates a fresh random IV for every call and returns it alongside
    /// the ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<KeyEnvelope> {
        let cipher = self.cipher()?;
        let iv = random_bytes(IV_SIZE)?;

        let cipherbytes = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok(KeyEnvelope { cipherbytes, iv })
    }

    /// Decrypt an envelope produced by [`DerivedKey::encrypt`].
    ///
    /// Fails with [`CryptoError::DecryptionFailed`] if the key is wrong or
    /// the ciphertext was tampered with. The authentication tag guarantees
    /// a wrong password never yields silently different plaintext.
    pub fn decrypt(&self, cipherbytes: &[u8], iv: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if iv.len() != IV_SIZE {
            return Err(CryptoError::InvalidNonceSize {
                expected: IV_SIZE,
                actual: iv.len(),
            });
        }

        let cipher = self.cipher()?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(iv), cipherbytes)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        Ok(Zeroizing::new(plaintext))
    }

    fn cipher(&self) -> Result<Aes128Gcm> {
        if self.key.len() != CIPHER_KEY_SIZE {
            return Err(CryptoError::InvalidKeySize {
                expected: CIPHER_KEY_SIZE,
                actual: self.key.len(),
            });
        }
        Ok(Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&self.key)))
    }
}
