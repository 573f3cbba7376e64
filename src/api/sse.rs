//! Server-Sent Events for call snapshots

use crate::session::CallSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream the current snapshot followed by every later one
pub fn snapshot_stream(
    initial: CallSnapshot,
    updates: tokio::sync::broadcast::Receiver<CallSnapshot>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(snapshot_event(&initial)) });

    let broadcasts = BroadcastStream::new(updates).filter_map(|result| match result {
        Ok(snapshot) => Some(Ok(snapshot_event(&snapshot))),
        Err(_) => None, // Skip lagged snapshots; the next one is complete anyway
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn snapshot_event(snapshot: &CallSnapshot) -> Event {
    let data = serde_json::to_string(snapshot).unwrap_or_else(|_| "null".to_string());
    Event::default().event("snapshot").data(data)
}
