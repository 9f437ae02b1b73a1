//! Identity trait definitions: the account subsystem boundary and the event
//! publisher seam.

use crate::errors::Result;
use crate::events::Event;
use crate::types::LoginOptions;
use async_trait::async_trait;
use peervault_store::StoreHandle;
use zeroize::Zeroizing;

/// A freshly created account index: its locator and the raw key that
/// unlocks it. The raw key is zeroized on drop.
pub struct NewAccountIndex {
    /// Opaque locator for the account index
    pub address: String,
    /// Raw account-index key, to be wrapped before storage
    pub raw_key: Zeroizing<Vec<u8>>,
}

/// Opaque live session object owned by the account subsystem.
///
/// Handles are cloned into and out of the session registry; providers
/// typically back them with an `Arc`.
#[async_trait]
pub trait AccountHandle: Clone + Send + Sync + 'static {
    /// Verify this handle was opened from the given address and key material
    async fn key_check(&self, address: &str, raw_key: &[u8]) -> bool;
}

/// Account subsystem boundary.
///
/// Injected into the identity service; the service never looks inside the
/// account index, it only creates and opens it.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Store handle type accounts are created and opened through
    type Handle: StoreHandle;
    /// Live account handle type
    type Account: AccountHandle;

    /// Create a fresh account index, returning its address and raw key
    async fn create_account_index(&self, store: &Self::Handle) -> Result<NewAccountIndex>;

    /// Open a live account handle from an address and its raw key
    async fn open_account(
        &self,
        store: &Self::Handle,
        address: &str,
        raw_key: &[u8],
        options: &LoginOptions,
    ) -> Result<Self::Account>;
}

/// Event publisher trait for lifecycle and status events.
///
/// Injected into the identity service so observers can be wired in without
/// a dependency cycle.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a lifecycle event
    async fn publish(&self, event: Event) -> Result<()>;
}

/// No-op event publisher for callers without observers
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: Event) -> Result<()> {
        Ok(())
    }
}
