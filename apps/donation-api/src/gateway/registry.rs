//! Registry of live admin notification connections.

use axum::extract::ws::Utf8Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use donation_common::IdKind;

/// A serialized event ready to be written to a socket. Cheap to clone.
pub type Frame = Utf8Bytes;

/// Outbound frames buffered per connection before it is considered stalled.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Why a frame could not be queued for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection task has exited.
    Closed,
    /// The connection is not draining its queue.
    Full,
}

/// Server-side end of one admin connection.
///
/// Holds the sending half of the connection's outbound queue. Once the
/// registry drops its handle the connection task sees its queue close and
/// shuts the socket down.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: String,
    pub username: String,
    outbound: mpsc::Sender<Frame>,
}

impl ConnectionHandle {
    /// Create a handle and the receiving half its connection task drains.
    pub fn new(username: impl Into<String>) -> (Self, mpsc::Receiver<Frame>) {
        let (outbound, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let handle = Self {
            id: IdKind::Connection.generate(),
            username: username.into(),
            outbound,
        };
        (handle, rx)
    }

    /// Queue a frame without waiting.
    pub fn try_deliver(&self, frame: Frame) -> Result<(), DeliveryError> {
        self.outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
        })
    }
}

/// Process-wide set of admitted connections.
///
/// Every read and write goes through one mutex, so a snapshot never observes
/// a half-applied registration. Handles are kept in connect order.
pub struct ConnectionRegistry {
    connections: Mutex<Vec<ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, handle: ConnectionHandle) {
        self.connections.lock().push(handle);
    }

    /// Remove a connection. Returns whether it was present.
    pub fn unregister(&self, connection_id: &str) -> bool {
        let mut conns = self.connections.lock();
        match conns.iter().position(|h| h.id == connection_id) {
            Some(i) => {
                conns.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn active_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// One username per connection; an admin with two tabs open appears twice.
    pub fn active_usernames(&self) -> Vec<String> {
        self.connections
            .lock()
            .iter()
            .map(|h| h.username.clone())
            .collect()
    }

    /// Copy of the current membership, for delivery outside the lock.
    pub fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.connections.lock().clone()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
