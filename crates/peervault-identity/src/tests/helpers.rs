//! Test helpers and mocks for identity service tests.

use crate::errors::Result;
use crate::traits::{AccountHandle, AccountProvider, NewAccountIndex, NoOpEventPublisher};
use crate::types::{LoginOptions, ServiceOptions};
use crate::IdentityService;
use async_trait::async_trait;
use peervault_crypto::random_bytes;
use peervault_store::errors::Result as StoreResult;
use peervault_store::memory::{MemoryStoreHandle, MemoryStoreProvider};
use peervault_store::{
    Address, CollectionKind, CollectionOptions, DocumentCollection, NamespaceOptions, StoreError,
    StoreHandle, StoreProvider,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use zeroize::Zeroizing;

pub type TestService =
    IdentityService<MemoryStoreProvider, TestAccountProvider<MemoryStoreHandle>, NoOpEventPublisher>;

/// Helper to create a ready identity service over memory storage
pub async fn create_test_service() -> Arc<TestService> {
    IdentityService::create(
        MemoryStoreProvider::new(),
        TestAccountProvider::default(),
        ServiceOptions::default(),
    )
    .await
    .unwrap()
}

/// Account handle mock that remembers what it was opened with
#[derive(Clone, Debug)]
pub struct TestAccountHandle {
    /// Distinguishes separately opened handles
    pub instance: Uuid,
    address: String,
    raw_key: Arc<Vec<u8>>,
    fail_key_check: Arc<AtomicBool>,
}

#[async_trait]
impl AccountHandle for TestAccountHandle {
    async fn key_check(&self, address: &str, raw_key: &[u8]) -> bool {
        if self.fail_key_check.load(Ordering::SeqCst) {
            return false;
        }
        self.address == address && self.raw_key.as_slice() == raw_key
    }
}

/// Account provider mock backed by random raw keys
pub struct TestAccountProvider<H> {
    /// Number of open_account calls across all clones
    pub opened: Arc<AtomicUsize>,
    /// Force key_check to fail on every handle opened by this provider
    pub fail_key_check: Arc<AtomicBool>,
    _handle: PhantomData<fn() -> H>,
}

impl<H> Default for TestAccountProvider<H> {
    fn default() -> Self {
        Self {
            opened: Arc::new(AtomicUsize::new(0)),
            fail_key_check: Arc::new(AtomicBool::new(false)),
            _handle: PhantomData,
        }
    }
}

impl<H> Clone for TestAccountProvider<H> {
    fn clone(&self) -> Self {
        Self {
            opened: Arc::clone(&self.opened),
            fail_key_check: Arc::clone(&self.fail_key_check),
            _handle: PhantomData,
        }
    }
}

#[async_trait]
impl<H: StoreHandle + 'static> AccountProvider for TestAccountProvider<H> {
    type Handle = H;
    type Account = TestAccountHandle;

    async fn create_account_index(&self, _store: &Self::Handle) -> Result<NewAccountIndex> {
        Ok(NewAccountIndex {
            address: format!("/accounts/{}", Uuid::new_v4()),
            raw_key: Zeroizing::new(random_bytes(32).unwrap()),
        })
    }

    async fn open_account(
        &self,
        _store: &Self::Handle,
        address: &str,
        raw_key: &[u8],
        _options: &LoginOptions,
    ) -> Result<Self::Account> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(TestAccountHandle {
            instance: Uuid::new_v4(),
            address: address.to_string(),
            raw_key: Arc::new(raw_key.to_vec()),
            fail_key_check: Arc::clone(&self.fail_key_check),
        })
    }
}

/// Store provider that delegates to memory storage but fails
/// close_namespace for selected namespace ids
pub struct FlakyCloseProvider {
    inner: MemoryStoreProvider,
    /// Namespace ids whose close fails
    pub fail_close_for: Arc<RwLock<HashSet<String>>>,
}

impl FlakyCloseProvider {
    pub fn new() -> Self {
        Self {
            inner: MemoryStoreProvider::new(),
            fail_close_for: Arc::new(RwLock::new(HashSet::new())),
        }
    }
}

#[async_trait]
impl StoreProvider for FlakyCloseProvider {
    type Handle = MemoryStoreHandle;

    async fn open_namespace(
        &self,
        id: &str,
        options: &NamespaceOptions,
    ) -> StoreResult<Self::Handle> {
        self.inner.open_namespace(id, options).await
    }

    async fn close_namespace(&self, id: &str) -> StoreResult<()> {
        if self.fail_close_for.read().await.contains(id) {
            return Err(StoreError::Namespace(format!(
                "connection teardown failed for {}",
                id
            )));
        }
        self.inner.close_namespace(id).await
    }
}

/// Store provider whose collections never load
pub struct FailingStoreProvider {
    /// Number of query/get/put calls that reached a collection
    pub accesses: Arc<AtomicUsize>,
}

impl FailingStoreProvider {
    pub fn new() -> Self {
        Self {
            accesses: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl StoreProvider for FailingStoreProvider {
    type Handle = FailingHandle;

    async fn open_namespace(
        &self,
        _id: &str,
        _options: &NamespaceOptions,
    ) -> StoreResult<Self::Handle> {
        Ok(FailingHandle {
            accesses: Arc::clone(&self.accesses),
        })
    }

    async fn close_namespace(&self, _id: &str) -> StoreResult<()> {
        Ok(())
    }
}

pub struct FailingHandle {
    accesses: Arc<AtomicUsize>,
}

#[async_trait]
impl StoreHandle for FailingHandle {
    type Collection = FailingCollection;

    async fn determine_address(&self, name: &str, kind: CollectionKind) -> StoreResult<Address> {
        Ok(Address::new(format!("/failing/{}/{}", kind.as_str(), name)))
    }

    async fn open_document_collection(
        &self,
        _address: &Address,
        _options: &CollectionOptions,
    ) -> StoreResult<Self::Collection> {
        Ok(FailingCollection {
            accesses: Arc::clone(&self.accesses),
        })
    }
}

pub struct FailingCollection {
    accesses: Arc<AtomicUsize>,
}

#[async_trait]
impl DocumentCollection for FailingCollection {
    async fn load(&self) -> StoreResult<()> {
        Err(StoreError::Collection("replica unavailable".to_string()))
    }

    async fn query<R, F>(&self, _predicate: F) -> StoreResult<Vec<R>>
    where
        R: DeserializeOwned,
        F: Fn(&R) -> bool + Send + Sync,
    {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Collection("replica unavailable".to_string()))
    }

    async fn get<R>(&self, _prefix: &str) -> StoreResult<Vec<R>>
    where
        R: DeserializeOwned,
    {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Collection("replica unavailable".to_string()))
    }

    async fn put<R>(&self, _key: &str, _record: &R) -> StoreResult<()>
    where
        R: Serialize + Send + Sync,
    {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Collection("replica unavailable".to_string()))
    }
}
