//! Lifecycle events and the broadcast-backed publisher.

use crate::errors::Result;
use crate::traits::EventPublisher;
use crate::types::SystemStatus;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Lifecycle events published by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// System status transition
    Status(SystemStatus),
    /// A new identity record was created
    NewIdentity {
        /// Id of the new identity
        id: String,
    },
    /// An identity obtained a live account handle
    LoggedIn {
        /// Id of the identity
        id: String,
        /// Username of the identity
        name: String,
    },
}

/// Event publisher backed by a tokio broadcast channel.
///
/// Observers call [`BroadcastPublisher::subscribe`]; publishing with no
/// active observers is not an error.
pub struct BroadcastPublisher {
    sender: broadcast::Sender<Event>,
}

impl BroadcastPublisher {
    /// Create a publisher buffering up to `capacity` events per observer
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: Event) -> Result<()> {
        // send only fails when no receiver exists, which is fine
        let _ = self.sender.send(event);
        Ok(())
    }
}
