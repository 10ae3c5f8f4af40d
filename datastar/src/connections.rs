//! Connection grouping and fan-out delivery.

use log::{debug, warn};
use serde::Serialize;
use sse::connection::{Connection, ConnectionId};

use crate::envelope::EventEnvelope;
use crate::error::{Error, UsageErrorKind};

/// The immutable, deduplicated, non-empty group of client connections one
/// emitted event targets.
///
/// Built once per emitter and never mutated afterwards; emitters hold their
/// own copy, so changes to the registry between construction and emit do
/// not affect an in-flight event.
#[derive(Debug, Clone)]
pub struct ConnectionSet {
    connections: Vec<Connection>,
}

impl ConnectionSet {
    /// Build a set from any collection of connections. Duplicates (by
    /// connection id) are dropped, first occurrence wins, insertion order
    /// is preserved. Fails when the input is empty.
    pub fn new<I>(connections: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Connection>,
    {
        let mut deduped: Vec<Connection> = Vec::new();
        for connection in connections {
            if !deduped.iter().any(|c| c.id() == connection.id()) {
                deduped.push(connection);
            }
        }
        if deduped.is_empty() {
            return Err(Error::usage(UsageErrorKind::EmptyConnectionSet));
        }
        Ok(Self {
            connections: deduped,
        })
    }

    /// A set targeting a single connection.
    pub fn single(connection: Connection) -> Self {
        Self {
            connections: vec![connection],
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    // Never true once constructed; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }
}

/// Outcome of fanning one event out to a connection set.
#[derive(Debug, Serialize)]
pub struct DeliveryReport {
    /// Number of connections a send was attempted to. Always equals the
    /// size of the targeted connection set.
    pub attempted: usize,
    /// Connections whose send failed and were marked closed. Callers
    /// should drop these from future connection sets.
    pub failed: Vec<ConnectionId>,
}

impl DeliveryReport {
    /// True when every targeted connection accepted the frame.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Send a finalized envelope to every connection in the set.
///
/// Exactly one send attempt per connection, no retries. A failed send
/// marks that connection closed and never aborts delivery to the others.
pub(crate) fn dispatch(envelope: EventEnvelope, connections: &ConnectionSet) -> DeliveryReport {
    debug!(
        "Dispatching event {} to {} connection(s)",
        envelope.id(),
        connections.len()
    );
    let event = envelope.into_event();
    let mut failed = Vec::new();
    for connection in connections.iter() {
        if let Err(err) = connection.send(event.clone()) {
            warn!(
                "Failed to send event to connection {}: {}. Connection marked closed.",
                connection.id().as_str(),
                err
            );
            connection.mark_closed();
            failed.push(connection.id().clone());
        }
    }
    DeliveryReport {
        attempted: connections.len(),
        failed,
    }
}
