//! # peervault-store
//!
//! Document-store abstraction layer for peervault.
//!
//! This crate defines the interface boundary to the distributed document
//! store (namespaces, collection addresses, document collections) and ships
//! an in-memory provider used for local operation and tests.

#![warn(clippy::all)]

pub mod errors;
pub mod memory;
pub mod traits;
pub mod types;

pub use errors::{Result, StoreError};
pub use memory::MemoryStoreProvider;
pub use traits::{DocumentCollection, StoreHandle, StoreProvider};
pub use types::{Address, CollectionKind, CollectionOptions, NamespaceOptions};
