//! Shared application services: configuration, logging, and state.

use std::sync::Arc;

use datastar::Datastar;
use sse::connection::ConnectionRegistry;

pub mod config;
pub mod logging;

use config::Config;

// Service-level state containing the shared infrastructure pieces.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub datastar: Arc<Datastar>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<ConnectionRegistry>,
        datastar: Arc<Datastar>,
    ) -> Self {
        Self {
            registry,
            datastar,
            config,
        }
    }
}
