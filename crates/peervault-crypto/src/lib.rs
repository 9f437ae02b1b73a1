//! # peervault-crypto
//!
//! Cryptographic envelope primitives for the peervault identity system.
//!
//! This crate implements the password-based key-wrapping envelope: a
//! symmetric key is derived from a password and salt, and the raw
//! account-index key is sealed under it with an authenticated cipher.
//!
//! ## Security Properties
//!
//! - Derived and raw key material is zeroized after use
//! - Authenticated encryption only; tampering is always detected
//! - No unsafe code
//! - Errors never carry password or key bytes

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod envelope;
pub mod errors;
pub mod random;
pub mod utils;

pub use constants::*;
pub use envelope::{derive_key, DerivedKey, KeyEnvelope};
pub use errors::CryptoError;
pub use random::random_bytes;
pub use utils::current_timestamp;
