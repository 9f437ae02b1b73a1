//! Shared store types: addresses, collection kinds, open options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque locator for a document collection within the distributed store.
///
/// The address format is owned by the store provider; this layer only
/// carries it between `determine_address` and `open_document_collection`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Wrap a provider-issued address string
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The raw address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of collection to resolve an address for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Queryable document collection
    Documents,
    /// Flat key-value collection
    KeyValue,
}

impl CollectionKind {
    /// Provider-facing name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Documents => "documents",
            CollectionKind::KeyValue => "keyvalue",
        }
    }
}

/// Options for opening a namespace
#[derive(Debug, Clone)]
pub struct NamespaceOptions {
    /// Create the namespace if it does not exist
    pub create: bool,
}

impl Default for NamespaceOptions {
    fn default() -> Self {
        Self { create: true }
    }
}

/// Options for opening a document collection
#[derive(Debug, Clone)]
pub struct CollectionOptions {
    /// Create the collection if it does not exist
    pub create: bool,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self { create: true }
    }
}
