use axum::http::StatusCode;
use axum::Json;
use datastar::DeliveryReport;
use log::*;
use serde::Serialize;
use service::AppState;

pub(crate) mod channel_controller;
pub(crate) mod events_controller;
pub(crate) mod health_check_controller;

/// JSON body returned by the emitting controllers: how the fan-out went.
#[derive(Debug, Serialize)]
pub(crate) struct DeliveryResponse {
    delivered: usize,
    pruned: usize,
}

/// Turn a delivery report into a response, dropping the connections that
/// failed from the registry so later emits do not target dead streams.
pub(crate) fn delivery_response(
    app_state: &AppState,
    report: DeliveryReport,
) -> (StatusCode, Json<DeliveryResponse>) {
    for connection_id in &report.failed {
        warn!("Pruning dead SSE connection {}", connection_id.as_str());
        app_state.registry.unregister(connection_id);
    }
    let pruned = report.failed.len();
    (
        StatusCode::OK,
        Json(DeliveryResponse {
            delivered: report.attempted - pruned,
            pruned,
        }),
    )
}
