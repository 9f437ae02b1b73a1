//! Identity error types.
//!
//! Error text always names the username or identity id involved and never
//! carries password or key material.

use peervault_crypto::CryptoError;
use peervault_store::StoreError;
use thiserror::Error;

/// One failed logout within [`IdentityError::LogoutAll`]
#[derive(Debug)]
pub struct LogoutFailure {
    /// Username whose logout failed
    pub name: String,
    /// The failure
    pub error: IdentityError,
}

/// Identity operation errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Bad argument
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Username already bound to an identity record
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    /// No identity record for the username
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// No live session for the identity
    #[error("Identity not logged in: {0}")]
    NotLoggedIn(String),

    /// Write succeeded but the read-back yielded nothing
    #[error("Identity record for {0} was not readable after write")]
    PersistenceConsistency(String),

    /// Wrong password or corrupted envelope
    #[error("Login failed for identity {name}")]
    Login {
        /// Username the login was attempted for
        name: String,
        /// Underlying cryptographic cause
        #[source]
        source: CryptoError,
    },

    /// Cached account handle was opened with different key material
    #[error("Cached session for identity {0} does not match the supplied key")]
    SessionConsistency(String),

    /// Store open/load failure during initialization (fatal for the instance)
    #[error("Identity system initialization failed")]
    InitializationFailed,

    /// One or more logouts failed during logout_all
    #[error("Logout failed for {} of the active identities", .failures.len())]
    LogoutAll {
        /// Every failed logout with its cause
        failures: Vec<LogoutFailure>,
    },

    /// Account subsystem error
    #[error("Account error for identity {name}: {reason}")]
    Account {
        /// Username or identity id involved
        name: String,
        /// Provider-reported reason
        reason: String,
    },

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Cryptographic error
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Result type for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;
