//! HTTP surface: the SSE subscribe endpoint and the controllers that emit
//! Datastar events to subscribed channels.

pub(crate) mod controller;
pub mod router;

pub use router::router;
pub use service::AppState;
