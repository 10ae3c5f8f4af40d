use axum::routing::{get, post};
use axum::Router;
use service::AppState;

use crate::controller::{channel_controller, events_controller, health_check_controller};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .route("/events/:channel", get(events_controller::subscribe))
        .route(
            "/channels/:channel/message",
            post(channel_controller::message),
        )
        .route(
            "/channels/:channel/signals",
            post(channel_controller::signals),
        )
        .route(
            "/channels/:channel/reload",
            post(channel_controller::reload),
        )
        .with_state(app_state)
}
