//! Key-wrapping protocol.
//!
//! Turns a password into the raw account-index key and back: `wrap_key`
//! seals a raw key at registration, `unwrap_key` recovers it at login. The
//! envelope parameters are fixed in `peervault-crypto` and must match across
//! both paths.

use peervault_crypto::{
    derive_key, random_bytes, CryptoError, KEY_SALT_SIZE, KEY_STRENGTH,
};
use zeroize::Zeroizing;

/// Stored form of a wrapped raw key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    /// Salt the symmetric key was derived with
    pub salt: Vec<u8>,
    /// Ciphertext of the raw key
    pub cipherbytes: Vec<u8>,
    /// Nonce paired with `cipherbytes`
    pub iv: Vec<u8>,
}

/// Wrap a raw account-index key under a password.
///
/// Generates a fresh salt and derives the symmetric key from
/// `(password, salt)`; the envelope carries its own fresh IV.
pub fn wrap_key(password: &str, raw_key: &[u8]) -> Result<WrappedKey, CryptoError> {
    let salt = random_bytes(KEY_SALT_SIZE)?;
    let derived = derive_key(password.as_bytes(), &salt, KEY_STRENGTH)?;
    let envelope = derived.encrypt(raw_key)?;

    Ok(WrappedKey {
        salt,
        cipherbytes: envelope.cipherbytes,
        iv: envelope.iv,
    })
}

/// Unwrap a stored envelope back into the raw account-index key.
///
/// Fails with [`CryptoError::DecryptionFailed`] if the password is wrong or
/// the envelope is corrupted. On success the plaintext is exactly the byte
/// sequence that was wrapped.
pub fn unwrap_key(
    password: &str,
    salt: &[u8],
    cipherbytes: &[u8],
    iv: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let derived = derive_key(password.as_bytes(), salt, KEY_STRENGTH)?;
    derived.decrypt(cipherbytes, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let raw_key = random_bytes(32).unwrap();
        let wrapped = wrap_key("secret", &raw_key).unwrap();

        let recovered = wrap_unwrap(&wrapped, "secret").unwrap();
        assert_eq!(&recovered[..], &raw_key[..]);
    }

    #[test]
    fn test_wrong_password_fails() {
        let raw_key = random_bytes(32).unwrap();
        let wrapped = wrap_key("secret", &raw_key).unwrap();

        let result = wrap_unwrap(&wrapped, "not-the-secret");
        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_fresh_salt_and_iv_per_wrap() {
        let raw_key = random_bytes(32).unwrap();
        let a = wrap_key("secret", &raw_key).unwrap();
        let b = wrap_key("secret", &raw_key).unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.cipherbytes, b.cipherbytes);
    }

    #[test]
    fn test_salt_has_configured_length() {
        let wrapped = wrap_key("secret", b"raw").unwrap();
        assert_eq!(wrapped.salt.len(), KEY_SALT_SIZE);
    }

    fn wrap_unwrap(wrapped: &WrappedKey, password: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        unwrap_key(password, &wrapped.salt, &wrapped.cipherbytes, &wrapped.iv)
    }
}
