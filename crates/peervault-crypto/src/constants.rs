//! Envelope constants.
//!
//! These parameters are shared by the wrap (registration) and unwrap (login)
//! paths. Changing any of them invalidates every stored envelope.

/// Size of the random salt fed into key derivation, in bytes
pub const KEY_SALT_SIZE: usize = 12;

/// Strength of the derived symmetric key, in bits.
///
/// The KDF output length is `KEY_STRENGTH / 8` bytes. Passed through the
/// derivation API as a tunable rather than baked into call sites.
pub const KEY_STRENGTH: u32 = 128;

/// Size of the AES-GCM nonce, in bytes (96 bits)
pub const IV_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag, in bytes
pub const TAG_SIZE: usize = 16;

/// Argon2id parameters for password-based key derivation
pub mod argon2_params {
    use argon2::{Params, Version};

    /// Memory cost: 64 MiB
    pub const MEMORY_COST: u32 = 64 * 1024;

    /// Time cost: 3 iterations
    pub const TIME_COST: u32 = 3;

    /// Parallelism: 1 thread
    pub const PARALLELISM: u32 = 1;

    /// Get Argon2id parameters for the given output length
    pub fn get_params(output_len: usize) -> Params {
        Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(output_len))
            .expect("valid Argon2id parameters")
    }

    /// Argon2 version
    pub const VERSION: Version = Version::V0x13;
}
