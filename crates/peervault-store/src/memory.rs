//! In-memory store provider.
//!
//! Namespaces and collections live in process memory. Data survives
//! `close_namespace` (closing tears down a connection, not the store), so
//! a later reopen observes the same documents.

use crate::errors::{Result, StoreError};
use crate::traits::{DocumentCollection, StoreHandle, StoreProvider};
use crate::types::{Address, CollectionKind, CollectionOptions, NamespaceOptions};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type Docs = Arc<RwLock<BTreeMap<String, serde_json::Value>>>;
type Namespaces = Arc<RwLock<HashMap<String, HashMap<String, Docs>>>>;

/// In-memory document-store provider
#[derive(Default)]
pub struct MemoryStoreProvider {
    namespaces: Namespaces,
}

impl MemoryStoreProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreProvider for MemoryStoreProvider {
    type Handle = MemoryStoreHandle;

    async fn open_namespace(&self, id: &str, options: &NamespaceOptions) -> Result<Self::Handle> {
        let mut namespaces = self.namespaces.write().await;

        if !namespaces.contains_key(id) {
            if !options.create {
                return Err(StoreError::NotFound(format!("namespace {}", id)));
            }
            namespaces.insert(id.to_string(), HashMap::new());
        }

        debug!(namespace = id, "Opened namespace");

        Ok(MemoryStoreHandle {
            id: id.to_string(),
            namespaces: Arc::clone(&self.namespaces),
        })
    }

    async fn close_namespace(&self, id: &str) -> Result<()> {
        // Connection teardown only; documents are retained for reopen.
        debug!(namespace = id, "Closed namespace");
        Ok(())
    }
}

/// Handle to an open in-memory namespace
pub struct MemoryStoreHandle {
    id: String,
    namespaces: Namespaces,
}

#[async_trait]
impl StoreHandle for MemoryStoreHandle {
    type Collection = MemoryCollection;

    async fn determine_address(&self, name: &str, kind: CollectionKind) -> Result<Address> {
        Ok(Address::new(format!(
            "/memory/{}/{}/{}",
            self.id,
            kind.as_str(),
            name
        )))
    }

    async fn open_document_collection(
        &self,
        address: &Address,
        options: &CollectionOptions,
    ) -> Result<Self::Collection> {
        let mut namespaces = self.namespaces.write().await;
        let collections = namespaces
            .get_mut(&self.id)
            .ok_or_else(|| StoreError::NotFound(format!("namespace {}", self.id)))?;

        if !collections.contains_key(address.as_str()) {
            if !options.create {
                return Err(StoreError::NotFound(format!("collection {}", address)));
            }
            collections.insert(
                address.as_str().to_string(),
                Arc::new(RwLock::new(BTreeMap::new())),
            );
        }

        Ok(MemoryCollection {
            docs: Arc::clone(&collections[address.as_str()]),
        })
    }
}

/// In-memory document collection
pub struct MemoryCollection {
    docs: Docs,
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn load(&self) -> Result<()> {
        let docs = self.docs.read().await;
        debug!(records = docs.len(), "Loaded collection");
        Ok(())
    }

    async fn query<R, F>(&self, predicate: F) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        F: Fn(&R) -> bool + Send + Sync,
    {
        let docs = self.docs.read().await;
        let mut matches = Vec::new();

        for value in docs.values() {
            let record: R = serde_json::from_value(value.clone())
                .map_err(|e| StoreError::Deserialization(e.to_string()))?;
            if predicate(&record) {
                matches.push(record);
            }
        }

        Ok(matches)
    }

    async fn get<R>(&self, prefix: &str) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let docs = self.docs.read().await;
        let mut matches = Vec::new();

        for (key, value) in docs.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            let record: R = serde_json::from_value(value.clone())
                .map_err(|e| StoreError::Deserialization(e.to_string()))?;
            matches.push(record);
        }

        Ok(matches)
    }

    async fn put<R>(&self, key: &str, record: &R) -> Result<()>
    where
        R: Serialize + Send + Sync,
    {
        let value =
            serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut docs = self.docs.write().await;
        docs.insert(key.to_string(), value);
        Ok(())
    }
}
