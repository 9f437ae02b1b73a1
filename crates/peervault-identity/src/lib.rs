//! # peervault-identity
//!
//! Local identity and session subsystem for the peervault platform.
//!
//! This crate binds a username/password pair to the cryptographic key that
//! unlocks a per-user account index in the distributed document store. It is
//! responsible for:
//! - Bringing the local identity store online exactly once (initialization
//!   state machine)
//! - Wrapping and unwrapping the raw account-index key under a
//!   password-derived key
//! - Enforcing at-most-one live account handle per identity (session
//!   registry) and mediating login/logout

#![warn(clippy::all)]

pub mod errors;
pub mod events;
pub mod keyring;
mod service;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use errors::{IdentityError, LogoutFailure, Result};
pub use events::{BroadcastPublisher, Event};
pub use keyring::{unwrap_key, wrap_key, WrappedKey};
pub use service::IdentityService;
pub use traits::{AccountHandle, AccountProvider, EventPublisher, NewAccountIndex, NoOpEventPublisher};
pub use types::*;
