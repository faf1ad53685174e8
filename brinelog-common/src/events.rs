//! Event types for the brinelog client
//!
//! Provides the ClientEvent enum and the EventBus that carries the
//! authorization-required side channel from the transport layer to
//! whichever top-level controller owns the login surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Client-side events
///
/// Events are broadcast via [`EventBus`]. The transport publishes;
/// exactly one top-level controller is expected to subscribe and react
/// (show the password prompt, store the credential). Nothing in this
/// crate replays a failed call after a credential is supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// A request was rejected with 401. Emitted exactly once per failing
    /// call; the call itself still resolves as an error to its caller.
    AuthorizationRequired {
        /// Request path that was rejected (for diagnostics)
        path: String,
        /// When the rejection was observed
        timestamp: DateTime<Utc>,
    },

    /// A credential was written to persistent storage. Future calls pick
    /// it up automatically (the store is read per outbound call).
    CredentialStored {
        /// When the credential was stored
        timestamp: DateTime<Utc>,
    },

    /// The stored credential was cleared
    CredentialCleared {
        /// When the credential was cleared
        timestamp: DateTime<Utc>,
    },
}

/// Central event distribution bus for application-wide events
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block the transport)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// # Examples
///
/// ```
/// use brinelog_common::events::{ClientEvent, EventBus};
///
/// let bus = EventBus::new(64);
/// let mut rx = bus.subscribe();
///
/// bus.emit(ClientEvent::CredentialStored {
///     timestamp: chrono::Utc::now(),
/// });
///
/// // In async context:
/// // while let Ok(event) = rx.recv().await { ... }
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of subscribers that received the event. Zero
    /// subscribers is legal (e.g. in tests); the event is simply dropped.
    pub fn emit(&self, event: ClientEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => count,
            Err(_) => {
                tracing::debug!("event emitted with no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
