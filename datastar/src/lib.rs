//! Datastar SSE event encoding and multi-connection delivery.
//!
//! This crate turns application state changes into the SSE wire events the
//! Datastar front end library consumes, and fans each event out to a set
//! of open client connections.
//!
//! # Architecture
//!
//! - **Envelope**: every event shares one in-progress frame representation
//!   (generated UUID event id, event name, ordered data lines).
//! - **Emitters**: one single-use fluent builder per event kind
//!   (`PatchElements`, `PatchSignals`, `ExecuteScript`, `RemoveFragments`,
//!   `RemoveSignals`). Each validates its required fields at emit time and
//!   assembles its kind-specific data-line grammar on the envelope.
//! - **Dispatch**: a finalized envelope is sent to every connection of a
//!   `ConnectionSet` exactly once; a failed send marks that connection
//!   closed and is reported through `DeliveryReport` without aborting
//!   delivery to siblings.
//! - **Factory**: `Datastar` holds the template renderer, template suffix,
//!   and message source, and constructs emitters bound to a connection set.
//! - **Collaborators**: template rendering and message lookup are narrow
//!   traits injected at factory construction; plain functions satisfy them.
//!
//! # Error policy
//!
//! Missing required fields and encoding failures abort an emit with an
//! [`error::Error`] before any send. Delivery failures never surface as
//! errors: they are isolated per connection and enumerated in the returned
//! [`DeliveryReport`] so callers can prune dead connections.
//!
//! # Example: patching elements
//!
//! ```rust,ignore
//! let report = datastar
//!     .patch_elements(ConnectionSet::new(registry.channel_connections("lobby"))?)
//!     .template("notice")
//!     .selector("#main")
//!     .attribute("text", "deploy finished")
//!     .emit()?;
//! for connection_id in &report.failed {
//!     registry.unregister(connection_id);
//! }
//! ```

pub mod connections;
pub mod emitters;
pub mod envelope;
pub mod error;
mod factory;
pub mod patch_mode;
pub mod render;

pub use connections::{ConnectionSet, DeliveryReport};
pub use factory::Datastar;
pub use patch_mode::PatchMode;
