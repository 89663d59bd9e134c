//! Search-as-you-type over a WebSocket
//!
//! Each text frame is the current content of the search box. Frames are fed
//! through a [`SearchDebouncer`]; once a term has been left alone for the
//! configured delay, the first page of matches is sent back.

use crate::handlers::records::ListResponse;
use crate::state::AppState;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};
use venue_backend::SearchDebouncer;
use venue_core::pagination::PageWindow;
use venue_core::types::Record;

/// Upgrade to a live-search socket for the table behind `T`
pub async fn live_search<T: Record>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| live_search_connection::<T>(socket, state))
}

async fn results_message<T: Record>(state: &AppState, term: &str) -> String {
    let window = PageWindow::request(1, state.config.pagination.default_limit);
    let search = Some(term).filter(|t| !t.is_empty());
    match state.repository::<T>().list(window, search).await {
        Ok(page) => json!({
            "type": "results",
            "search": term,
            "data": ListResponse::from(page),
        }),
        Err(e) => {
            error!(table = %T::TABLE, "Live search failed: {}", e);
            json!({ "type": "error", "search": term, "error": e.to_string() })
        }
    }
    .to_string()
}

async fn live_search_connection<T: Record>(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let debouncer = SearchDebouncer::new(state.config.search.debounce_delay());
    let mut settled = debouncer.subscribe();

    info!(table = %T::TABLE, "Live search connection established");

    loop {
        tokio::select! {
            changed = settled.changed() => {
                if changed.is_err() {
                    break;
                }
                let term = settled.borrow_and_update().clone();
                let message = results_message::<T>(&state, &term).await;
                if sender.send(Message::Text(message)).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(term))) => {
                        debug!(term = %term, "Search keystroke");
                        debouncer.submit(term.trim());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => continue,
                }
            }
        }
    }

    debouncer.cancel();
    info!(table = %T::TABLE, "Live search connection closed");
}
