//! The `GET /events` long-lived stream.

use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use sse::{Frame, Hub, SubscriberHandle};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Unsubscribes when the response stream is dropped, which is how axum
/// reports that the client went away.
struct SubscriptionGuard {
    hub: Arc<Hub>,
    handle: SubscriberHandle,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        debug!("SSE connection {} closed, cleaning up", self.handle.id());
        self.hub.unsubscribe(&self.handle);
    }
}

/// GET open an event stream
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "Event stream of `data: <json>` records", content_type = "text/event-stream", body = String),
    )
)]
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::channel::<Frame>(app_state.config.subscriber_buffer.max(1));

    let hub = Arc::clone(&app_state.hub);
    let handle = hub.subscribe(Arc::new(tx)).await;
    debug!("Established SSE connection {}", handle.id());
    let guard = SubscriptionGuard { hub, handle };
    let shutdown = app_state.shutdown.clone();

    // The hub keeps the sender until the guard unsubscribes, so `recv` only
    // returns None once the hub itself has dropped the subscriber.
    let stream = stream! {
        let _guard = guard;
        loop {
            let frame = tokio::select! {
                frame = rx.recv() => frame,
                _ = shutdown.cancelled() => None,
            };
            let Some(frame) = frame else {
                break;
            };
            yield Ok::<_, Infallible>(Event::from(frame));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
