//! Server-Sent Events connection tracking.
//!
//! This crate owns the live client streams that Datastar events are
//! delivered over: cheap cloneable `Connection` handles over the sending
//! half of each stream, and a registry that tracks which streams are open
//! and which channel each one subscribed to.
//!
//! # Architecture
//!
//! - **Dual-index registry**: O(1) lookups for both connection cleanup
//!   (by connection id) and fan-out targeting (by channel name) via
//!   separate DashMap indices.
//! - **Handles, not streams**: the registry never touches the receiving
//!   half; the HTTP layer owns it and unregisters when the client goes
//!   away.
//! - **Permanent failure marking**: a connection whose send failed is
//!   marked closed; every later send fails fast until the handle is
//!   pruned from the registry.
//!
//! # Modules
//!
//! - `connection`: `Connection`, `ConnectionId`, and `ConnectionRegistry`

pub mod connection;

pub use connection::{Connection, ConnectionId, ConnectionRegistry};
