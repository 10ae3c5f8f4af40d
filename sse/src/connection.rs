use axum::response::sse::Event;
use dashmap::DashMap;
use log::*;
use serde::Serialize;
use std::collections::HashSet;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

// Channel names group connections for fan-out (one per page, topic, ...).
pub type ChannelName = String;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned when a frame cannot be handed to a connection's stream.
/// The stream is gone for good: either the client disconnected (the
/// receiving half was dropped) or the connection was marked closed after
/// an earlier failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamClosed;

impl fmt::Display for StreamClosed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "client stream is closed")
    }
}

impl StdError for StreamClosed {}

/// The sending half of one open client stream.
///
/// Cheaply cloneable handle: the registry keeps one clone, emitters
/// receive others. Once marked closed, every further send fails fast.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    sender: UnboundedSender<Result<Event, Infallible>>,
    closed: Arc<AtomicBool>,
}

impl Connection {
    /// Wrap the sending half of a client stream. Normally called by
    /// [`ConnectionRegistry::register`].
    pub fn new(sender: UnboundedSender<Result<Event, Infallible>>) -> Self {
        Self {
            id: ConnectionId::new(),
            sender,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue one framed event on the stream.
    pub fn send(&self, event: Event) -> Result<(), StreamClosed> {
        if self.is_closed() {
            return Err(StreamClosed);
        }
        self.sender.send(Ok(event)).map_err(|_| StreamClosed)
    }

    /// Mark the stream as terminated; all further sends fail fast. The
    /// receiving half is owned by the transport and cleans itself up when
    /// the response future is dropped.
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed) || self.sender.is_closed()
    }
}

struct RegisteredConnection {
    channel: ChannelName,
    connection: Connection,
}

/// Connection registry with dual indices for O(1) lookups
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, RegisteredConnection>,

    /// Secondary index: fast lookup by channel for fan-out targeting - O(1)
    channel_index: DashMap<ChannelName, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            channel_index: DashMap::new(),
        }
    }

    /// Register a new connection on `channel` and return its handle - O(1)
    pub fn register(
        &self,
        channel: impl Into<ChannelName>,
        sender: UnboundedSender<Result<Event, Infallible>>,
    ) -> Connection {
        let connection = Connection::new(sender);
        let channel = channel.into();

        self.connections.insert(
            connection.id().clone(),
            RegisteredConnection {
                channel: channel.clone(),
                connection: connection.clone(),
            },
        );

        self.channel_index
            .entry(channel)
            .or_default()
            .insert(connection.id().clone());

        info!("Registered SSE connection {}", connection.id().as_str());
        connection
    }

    /// Unregister a connection - O(1)
    pub fn unregister(&self, connection_id: &ConnectionId) {
        if let Some((_, registered)) = self.connections.remove(connection_id) {
            let channel = registered.channel;

            if let Some(mut entry) = self.channel_index.get_mut(&channel) {
                entry.remove(connection_id);

                // Clean up empty channel entries
                if entry.is_empty() {
                    drop(entry); // Release lock before removal
                    self.channel_index.remove(&channel);
                }
            }
            debug!("Unregistered SSE connection {}", connection_id.as_str());
        }
    }

    /// Snapshot of the connections subscribed to `channel` - O(1) lookup +
    /// O(k) clone where k = channel's connections
    pub fn channel_connections(&self, channel: &str) -> Vec<Connection> {
        let Some(connection_ids) = self.channel_index.get(channel) else {
            return Vec::new();
        };
        connection_ids
            .iter()
            .filter_map(|id| self.connections.get(id).map(|r| r.connection.clone()))
            .collect()
    }

    /// Snapshot of every registered connection - O(n)
    pub fn all_connections(&self) -> Vec<Connection> {
        self.connections
            .iter()
            .map(|entry| entry.value().connection.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
