use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::broadcast::{
    EventBroadcaster, TopicReceiver, TOPIC_APPOINTMENTS, TOPIC_DASHBOARD,
};

/// Live stream of single-appointment projections (bookings and cancels).
pub async fn appointments_ws(
    ws: WebSocketUpgrade,
    State(broadcaster): State<Arc<EventBroadcaster>>,
) -> Response {
    let updates = broadcaster.subscribe_appointments();
    ws.on_upgrade(move |socket| stream_topic(socket, updates, TOPIC_APPOINTMENTS))
}

/// Live stream of dashboard stats snapshots.
pub async fn dashboard_ws(
    ws: WebSocketUpgrade,
    State(broadcaster): State<Arc<EventBroadcaster>>,
) -> Response {
    let updates = broadcaster.subscribe_dashboard();
    ws.on_upgrade(move |socket| stream_topic(socket, updates, TOPIC_DASHBOARD))
}

/// Forward topic events to one websocket client until it goes away.
/// Dropping the receiver on exit is what deregisters the subscriber.
async fn stream_topic(socket: WebSocket, mut updates: TopicReceiver, topic: &'static str) {
    let connection_id = Uuid::new_v4();
    info!("Subscriber {} joined topic {}", connection_id, topic);

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = updates.recv() => match event {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        debug!("Subscriber {} on {} dropped mid-send", connection_id, topic);
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Subscriber {} on {} lagged, skipped {} events",
                        connection_id, topic, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                // Topics are push-only; inbound frames other than close are ignored.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Subscriber {} left topic {}", connection_id, topic);
}
