//! Store trait definitions.
//!
//! These traits form the interface boundary to the distributed document
//! store. Replication, conflict resolution, and transport are the provider's
//! concern; this layer only sees namespaces, addresses, and collections of
//! serde documents.

use crate::errors::Result;
use crate::types::{Address, CollectionKind, CollectionOptions, NamespaceOptions};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Entry point to the distributed document store.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    /// Namespace handle type produced by this provider
    type Handle: StoreHandle + 'static;

    /// Open (or create) a namespace within the store
    async fn open_namespace(&self, id: &str, options: &NamespaceOptions) -> Result<Self::Handle>;

    /// Tear down the store connection for a namespace
    async fn close_namespace(&self, id: &str) -> Result<()>;
}

/// Handle to an open namespace.
#[async_trait]
pub trait StoreHandle: Send + Sync {
    /// Collection type produced by this handle
    type Collection: DocumentCollection + 'static;

    /// Resolve the address of a named collection of the given kind
    async fn determine_address(&self, name: &str, kind: CollectionKind) -> Result<Address>;

    /// Open the document collection at an address
    async fn open_document_collection(
        &self,
        address: &Address,
        options: &CollectionOptions,
    ) -> Result<Self::Collection>;
}

/// A collection of serde documents keyed by string.
///
/// Documents serialize through the store's native record format; byte
/// sequences inside documents must round-trip byte-exact.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Load the collection's current contents from the store
    async fn load(&self) -> Result<()>;

    /// Return all documents matching a predicate
    async fn query<R, F>(&self, predicate: F) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        F: Fn(&R) -> bool + Send + Sync;

    /// Return all documents whose key starts with `prefix`
    async fn get<R>(&self, prefix: &str) -> Result<Vec<R>>
    where
        R: DeserializeOwned;

    /// Put a document under a key, overwriting any existing document
    async fn put<R>(&self, key: &str, record: &R) -> Result<()>
    where
        R: Serialize + Send + Sync;
}
