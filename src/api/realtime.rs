use super::auth::CurrentUser;
use super::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Streams the caller's change events as server-sent events. Each event is
/// named after the table it came from and carries the full row payload, so
/// a client can apply its own display rules (e.g. toast only on
/// high-priority notifications). The subscription ends when the client
/// disconnects; reconnecting is the client's concern.
pub async fn events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = user.id;

    let stream = BroadcastStream::new(state.events.subscribe())
        .filter_map(move |message| match message {
            Ok(event) if event.user_id == user_id => Some(event),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                // Slow consumers skip missed events and keep streaming.
                tracing::warn!(%user_id, skipped, "realtime subscriber lagged");
                None
            }
        })
        .map(|event| {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Ok(Event::default().event(event.table.to_string()).data(data))
        });

    tracing::debug!(%user_id, "realtime subscriber connected");
    Sse::new(stream).keep_alive(KeepAlive::default())
}
