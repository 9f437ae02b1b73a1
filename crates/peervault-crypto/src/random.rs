//! Random byte generation.

use crate::errors::{CryptoError, Result};
use rand::RngCore;

/// Generate `n` bytes from the operating system's CSPRNG.
pub fn random_bytes(n: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; n];
    rand::thread_rng()
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::RandomGenerationFailed(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        assert_eq!(random_bytes(12).unwrap().len(), 12);
        assert_eq!(random_bytes(0).unwrap().len(), 0);
    }

    #[test]
    fn test_random_bytes_are_not_constant() {
        let a = random_bytes(16).unwrap();
        let b = random_bytes(16).unwrap();
        assert_ne!(a, b, "two 16-byte draws should not collide");
    }
}
