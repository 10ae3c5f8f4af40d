use async_stream::stream;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use service::AppState;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// GET subscribe to a channel: establishes the long-lived connection a
/// client receives Datastar events on. One registry entry per open stream.
pub(crate) async fn subscribe(
    Path(channel): Path<String>,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE connection on channel {channel}");

    let (tx, mut rx) = mpsc::unbounded_channel();

    let connection = app_state.registry.register(channel.clone(), tx);
    let connection_id = connection.id().clone();
    let registry = app_state.registry.clone();

    // Events arrive from the channel; the sending half lives in the
    // registry and is handed to emitters via ConnectionSet snapshots.
    let stream = stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }

        // Client went away, clean up
        debug!("SSE connection closed on channel {channel}, cleaning up");
        registry.unregister(&connection_id);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
