//! One single-use emitter per Datastar event kind.
//!
//! Every emitter follows the same contract: obtain it from the
//! [`crate::Datastar`] factory bound to a connection set, configure it
//! fluently, then call `emit` exactly once. `emit` validates required
//! fields, assembles the kind-specific data lines into the shared
//! envelope, and fans the frame out to every connection.

mod execute_script;
mod patch_elements;
mod patch_signals;
mod remove_fragments;
mod remove_signals;

pub use execute_script::ExecuteScript;
pub use patch_elements::PatchElements;
pub use patch_signals::PatchSignals;
pub use remove_fragments::RemoveFragments;
pub use remove_signals::RemoveSignals;
