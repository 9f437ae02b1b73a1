//! Identity service implementation.
//!
//! Construction spawns the initialization task; every public operation
//! awaits the system reaching `Ready` before touching the record store, and
//! fails immediately once it is `Failed`.

use crate::errors::{IdentityError, LogoutFailure, Result};
use crate::events::Event;
use crate::keyring;
use crate::traits::{AccountHandle, AccountProvider, EventPublisher, NoOpEventPublisher};
use crate::types::{
    IdentityRecord, LoginOptions, ServiceOptions, SystemStatus, LOCAL_IDENTITY_PREFIX,
};
use futures::future::join_all;
use peervault_crypto::current_timestamp;
use peervault_store::{
    CollectionKind, CollectionOptions, DocumentCollection, NamespaceOptions, StoreHandle,
    StoreProvider,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

type Collection<S> = <<S as StoreProvider>::Handle as StoreHandle>::Collection;

/// Store handles produced by a successful initialization
struct LoginStore<S: StoreProvider> {
    handle: Arc<S::Handle>,
    collection: Arc<Collection<S>>,
}

impl<S: StoreProvider> Clone for LoginStore<S> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            collection: Arc::clone(&self.collection),
        }
    }
}

/// Identity service: initialization, registration, login, logout.
///
/// One instance owns one session registry and one initialization task;
/// multiple instances coexist independently.
pub struct IdentityService<S, A, E>
where
    S: StoreProvider,
    A: AccountProvider<Handle = S::Handle>,
    E: EventPublisher,
{
    store: Arc<S>,
    accounts: Arc<A>,
    events: Arc<E>,
    options: ServiceOptions,
    status: watch::Sender<SystemStatus>,
    login_store: RwLock<Option<LoginStore<S>>>,
    sessions: RwLock<HashMap<String, A::Account>>,
}

impl<S, A> IdentityService<S, A, NoOpEventPublisher>
where
    S: StoreProvider + 'static,
    A: AccountProvider<Handle = S::Handle> + 'static,
{
    /// Create an identity service with no event observers.
    ///
    /// Resolves once initialization reaches `Ready`, or fails with
    /// [`IdentityError::InitializationFailed`].
    pub async fn create(store: S, accounts: A, options: ServiceOptions) -> Result<Arc<Self>> {
        Self::create_with_publisher(store, accounts, NoOpEventPublisher, options).await
    }
}

impl<S, A, E> IdentityService<S, A, E>
where
    S: StoreProvider + 'static,
    A: AccountProvider<Handle = S::Handle> + 'static,
    E: EventPublisher + 'static,
{
    /// Construct the service and start initialization in the background.
    ///
    /// Most callers want [`IdentityService::create`] or
    /// [`IdentityService::create_with_publisher`], which also await
    /// readiness.
    pub fn new(store: S, accounts: A, events: E, options: ServiceOptions) -> Arc<Self> {
        let (status, _) = watch::channel(SystemStatus::Uninitialized);

        let service = Arc::new(Self {
            store: Arc::new(store),
            accounts: Arc::new(accounts),
            events: Arc::new(events),
            options,
            status,
            login_store: RwLock::new(None),
            sessions: RwLock::new(HashMap::new()),
        });

        tokio::spawn(Arc::clone(&service).initialize());
        service
    }

    /// Create an identity service with a custom event publisher
    pub async fn create_with_publisher(
        store: S,
        accounts: A,
        events: E,
        options: ServiceOptions,
    ) -> Result<Arc<Self>> {
        let service = Self::new(store, accounts, events, options);
        service.await_terminal().await?;
        Ok(service)
    }

    /// Current system status
    pub fn status(&self) -> SystemStatus {
        *self.status.borrow()
    }

    /// Watch status transitions
    pub fn subscribe_status(&self) -> watch::Receiver<SystemStatus> {
        self.status.subscribe()
    }

    /// Look up an identity record by username.
    ///
    /// A missing record is `None`, not an error.
    pub async fn find_identity(&self, username: &str) -> Result<Option<IdentityRecord>> {
        let store = self.ready().await?;
        let mut records: Vec<IdentityRecord> = store
            .collection
            .query(|record: &IdentityRecord| record.name == username)
            .await?;

        debug!(name = username, found = !records.is_empty(), "Identity lookup");
        Ok(records.pop())
    }

    /// List all locally created identity records
    pub async fn list_identities(&self) -> Result<Vec<IdentityRecord>> {
        let store = self.ready().await?;
        Ok(store.collection.get(LOCAL_IDENTITY_PREFIX).await?)
    }

    /// Register a new identity.
    ///
    /// Creates a fresh account index, wraps its raw key under the password,
    /// and persists the record. The duplicate check and the insert are not
    /// atomic: two concurrent registrations for the same new username can
    /// both pass the check before either writes.
    pub async fn register_identity(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IdentityRecord> {
        validate_credentials(username, password)?;

        let store = self.ready().await?;
        if self.find_identity(username).await?.is_some() {
            return Err(IdentityError::DuplicateUsername(username.to_string()));
        }

        let id = format!("{}{}", LOCAL_IDENTITY_PREFIX, Uuid::new_v4());
        let index = self.accounts.create_account_index(&store.handle).await?;
        let wrapped = keyring::wrap_key(password, &index.raw_key)?;

        let record = IdentityRecord {
            id,
            name: username.to_string(),
            account_address: index.address,
            salt: wrapped.salt,
            cipherbytes: wrapped.cipherbytes,
            iv: wrapped.iv,
            created_at: current_timestamp(),
        };
        store.collection.put(&record.id, &record).await?;

        // Confirm the write is visible before announcing the identity.
        let persisted = self
            .find_identity(username)
            .await?
            .ok_or_else(|| IdentityError::PersistenceConsistency(username.to_string()))?;

        info!(identity = %persisted.id, name = username, "Registered identity");
        self.publish(Event::NewIdentity {
            id: persisted.id.clone(),
        })
        .await;

        Ok(persisted)
    }

    /// Log an identity in and return its live account handle.
    ///
    /// A login attempt with an unused username transparently becomes its
    /// registration. Logging in while a session is already active verifies
    /// the cached handle against the supplied key material and returns it
    /// unchanged.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        options: &LoginOptions,
    ) -> Result<A::Account> {
        let record = match self.find_identity(username).await? {
            Some(record) => record,
            None => self.register_identity(username, password).await?,
        };

        let raw_key = keyring::unwrap_key(password, &record.salt, &record.cipherbytes, &record.iv)
            .map_err(|source| IdentityError::Login {
                name: username.to_string(),
                source,
            })?;

        {
            let sessions = self.sessions.read().await;
            if let Some(active) = sessions.get(&record.id) {
                return if active.key_check(&record.account_address, &raw_key).await {
                    debug!(identity = %record.id, "Returning cached account handle");
                    Ok(active.clone())
                } else {
                    Err(IdentityError::SessionConsistency(record.id.clone()))
                };
            }
        }

        let store = self.ready().await?;
        let account = self
            .accounts
            .open_account(&store.handle, &record.account_address, &raw_key, options)
            .await?;

        self.sessions
            .write()
            .await
            .insert(record.id.clone(), account.clone());

        info!(identity = %record.id, name = username, "Logged in");
        self.publish(Event::LoggedIn {
            id: record.id.clone(),
            name: record.name.clone(),
        })
        .await;

        Ok(account)
    }

    /// Log an identity out, tearing down its store connection
    pub async fn logout(&self, username: &str) -> Result<()> {
        let record = self
            .find_identity(username)
            .await?
            .ok_or_else(|| IdentityError::NotFound(username.to_string()))?;

        if !self.sessions.read().await.contains_key(&record.id) {
            return Err(IdentityError::NotLoggedIn(username.to_string()));
        }

        self.store.close_namespace(&record.id).await?;
        self.sessions.write().await.remove(&record.id);

        info!(identity = %record.id, name = username, "Logged out");
        Ok(())
    }

    /// Log out every active identity.
    ///
    /// Each logout runs independently and concurrently; one failure does
    /// not stop the others. Failures are aggregated into
    /// [`IdentityError::LogoutAll`].
    pub async fn logout_all(&self) -> Result<()> {
        let active: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        if active.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = self
            .list_identities()
            .await?
            .into_iter()
            .filter(|record| active.contains(&record.id))
            .map(|record| record.name)
            .collect();

        let results = join_all(names.iter().map(|name| self.logout(name))).await;

        let failures: Vec<LogoutFailure> = names
            .into_iter()
            .zip(results)
            .filter_map(|(name, result)| result.err().map(|error| LogoutFailure { name, error }))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(IdentityError::LogoutAll { failures })
        }
    }

    async fn initialize(self: Arc<Self>) {
        self.set_status(SystemStatus::Initializing).await;

        match self.open_login_store().await {
            Ok(store) => {
                *self.login_store.write().await = Some(store);
                self.set_status(SystemStatus::Ready).await;
            }
            Err(e) => {
                error!(error = %e, "Identity store initialization failed");
                self.set_status(SystemStatus::Failed).await;
            }
        }
    }

    async fn open_login_store(&self) -> Result<LoginStore<S>> {
        let handle = self
            .store
            .open_namespace(&self.options.namespace, &NamespaceOptions::default())
            .await?;
        let address = handle
            .determine_address(&self.options.collection, CollectionKind::Documents)
            .await?;
        let collection = handle
            .open_document_collection(&address, &CollectionOptions::default())
            .await?;
        collection.load().await?;

        info!(namespace = %self.options.namespace, %address, "Identity store ready");

        Ok(LoginStore {
            handle: Arc::new(handle),
            collection: Arc::new(collection),
        })
    }

    /// Await a terminal status: `Ok` on `Ready`, error on `Failed`
    async fn await_terminal(&self) -> Result<()> {
        let mut rx = self.status.subscribe();
        loop {
            let status = *rx.borrow_and_update();
            match status {
                SystemStatus::Ready => return Ok(()),
                SystemStatus::Failed => return Err(IdentityError::InitializationFailed),
                _ => rx
                    .changed()
                    .await
                    .map_err(|_| IdentityError::InitializationFailed)?,
            }
        }
    }

    async fn ready(&self) -> Result<LoginStore<S>> {
        self.await_terminal().await?;
        let guard = self.login_store.read().await;
        guard.clone().ok_or(IdentityError::InitializationFailed)
    }

    async fn set_status(&self, next: SystemStatus) {
        let current = *self.status.borrow();
        if current == next {
            // Republishing the current status is a no-op.
            return;
        }
        if !current.can_transition_to(next) {
            warn!(?current, ?next, "Ignoring invalid status transition");
            return;
        }

        self.status.send_replace(next);
        self.publish(Event::Status(next)).await;
    }

    async fn publish(&self, event: Event) {
        if let Err(e) = self.events.publish(event).await {
            error!(error = %e, "Event publish failed");
        }
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(IdentityError::Validation(
            "username must be non-empty text".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(IdentityError::Validation(
            "password must be non-empty text".to_string(),
        ));
    }
    Ok(())
}
