use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use service::AppState;

use datastar::ConnectionSet;

use crate::controller::delivery_response;

/// Request body for posting a rendered element patch to a channel.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageRequest {
    /// Template to render, without suffix.
    pub template: String,
    /// Attributes handed to the template renderer.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Optional CSS selector for the patch target.
    pub selector: Option<String>,
    /// Optional locale for template localization.
    pub locale: Option<String>,
}

/// Request body for patching signals on a channel.
#[derive(Debug, Deserialize)]
pub(crate) struct SignalsRequest {
    pub signals: Map<String, Value>,
    #[serde(default)]
    pub only_if_missing: Option<bool>,
}

/// POST a rendered element patch to every subscriber of a channel.
pub(crate) async fn message(
    Path(channel): Path<String>,
    State(app_state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> impl IntoResponse {
    let Some(connections) = channel_targets(&app_state, &channel) else {
        return no_subscribers(&channel);
    };

    let mut emitter = app_state.datastar.patch_elements(connections);
    emitter = match &request.locale {
        Some(locale) => emitter.localized_template(&request.template, locale),
        None => emitter.template(&request.template),
    };
    if let Some(selector) = &request.selector {
        emitter = emitter.selector(selector);
    }
    for (key, value) in request.attributes {
        emitter = emitter.attribute(key, value);
    }

    match emitter.emit() {
        Ok(report) => delivery_response(&app_state, report).into_response(),
        Err(err) => {
            error!("Failed to emit element patch on channel {channel}: {err}");
            StatusCode::UNPROCESSABLE_ENTITY.into_response()
        }
    }
}

/// POST updated signal values to every subscriber of a channel.
pub(crate) async fn signals(
    Path(channel): Path<String>,
    State(app_state): State<AppState>,
    Json(request): Json<SignalsRequest>,
) -> impl IntoResponse {
    let Some(connections) = channel_targets(&app_state, &channel) else {
        return no_subscribers(&channel);
    };

    let mut emitter = app_state.datastar.patch_signals(connections);
    if let Some(only_if_missing) = request.only_if_missing {
        emitter = emitter.only_if_missing(only_if_missing);
    }
    for (name, value) in request.signals {
        emitter = emitter.signal(name, value);
    }

    match emitter.emit() {
        Ok(report) => delivery_response(&app_state, report).into_response(),
        Err(err) => {
            error!("Failed to emit signal patch on channel {channel}: {err}");
            StatusCode::UNPROCESSABLE_ENTITY.into_response()
        }
    }
}

/// POST a page reload script to every subscriber of a channel.
pub(crate) async fn reload(
    Path(channel): Path<String>,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    let Some(connections) = channel_targets(&app_state, &channel) else {
        return no_subscribers(&channel);
    };

    match app_state
        .datastar
        .execute_script(connections)
        .auto_remove(true)
        .script("window.location.reload()")
        .emit()
    {
        Ok(report) => delivery_response(&app_state, report).into_response(),
        Err(err) => {
            error!("Failed to emit reload script on channel {channel}: {err}");
            StatusCode::UNPROCESSABLE_ENTITY.into_response()
        }
    }
}

/// Snapshot the channel's subscribers, or `None` when nobody is listening.
fn channel_targets(app_state: &AppState, channel: &str) -> Option<ConnectionSet> {
    ConnectionSet::new(app_state.registry.channel_connections(channel)).ok()
}

fn no_subscribers(channel: &str) -> axum::response::Response {
    debug!("No subscribers on channel {channel}");
    (StatusCode::NOT_FOUND, "no subscribers on channel").into_response()
}
