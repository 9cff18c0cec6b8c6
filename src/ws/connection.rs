//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered feed updates.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::FeedUpdate;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching updates from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut update_rx: broadcast::Receiver<FeedUpdate>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Update from EventBus
            update = update_rx.recv() => {
                match update {
                    Ok(update) => {
                        if subs.matches(&update.tournament) {
                            let Some(json) = event_message(&update) else {
                                continue;
                            };
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Serializes a feed update as an `event` message.
fn event_message(update: &FeedUpdate) -> Option<String> {
    let payload = match serde_json::to_value(update) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "feed update not serializable");
            return None;
        }
    };
    let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    serde_json::to_string(&msg).ok()
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error(String::new(), 400, "malformed JSON")).ok();
    };
    if msg.msg_type != WsMessageType::Command {
        return serde_json::to_string(&WsMessage::error(msg.id, 400, "expected a command")).ok();
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let payload = match command {
        WsCommand::Subscribe { tournaments } => {
            subs.subscribe(&tournaments);
            serde_json::json!({
                "subscribed": tournaments,
                "count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            })
        }
        WsCommand::Unsubscribe { tournaments } => {
            subs.unsubscribe(&tournaments);
            serde_json::json!({
                "unsubscribed": tournaments,
                "remaining_count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            })
        }
    };
    serde_json::to_string(&WsMessage::new(msg.id, WsMessageType::Response, payload)).ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::DataSource;

    fn reply(text: &str, subs: &mut SubscriptionManager) -> WsMessage {
        let Some(json) = handle_text_message(text, subs) else {
            panic!("expected a reply");
        };
        let Ok(msg) = serde_json::from_str::<WsMessage>(&json) else {
            panic!("reply is not an envelope");
        };
        msg
    }

    #[test]
    fn subscribe_then_unsubscribe() {
        let mut subs = SubscriptionManager::new();
        let msg = reply(
            r#"{"id":"1","type":"command","payload":{"command":"subscribe","tournaments":["Big Rock"]}}"#,
            &mut subs,
        );
        assert_eq!(msg.msg_type, WsMessageType::Response);
        assert_eq!(msg.id, "1");
        assert!(subs.matches("Big Rock"));

        let msg = reply(
            r#"{"id":"2","type":"command","payload":{"command":"unsubscribe","tournaments":["Big Rock"]}}"#,
            &mut subs,
        );
        assert_eq!(msg.payload.get("remaining_count").and_then(|v| v.as_u64()), Some(0));
        assert!(!subs.matches("Big Rock"));
    }

    #[test]
    fn malformed_json_is_error() {
        let mut subs = SubscriptionManager::new();
        let msg = reply("{ nope", &mut subs);
        assert_eq!(msg.msg_type, WsMessageType::Error);
    }

    #[test]
    fn unknown_command_is_error() {
        let mut subs = SubscriptionManager::new();
        let msg = reply(
            r#"{"id":"3","type":"command","payload":{"command":"swap"}}"#,
            &mut subs,
        );
        assert_eq!(msg.msg_type, WsMessageType::Error);
        assert_eq!(msg.payload.get("code").and_then(|v| v.as_u64()), Some(404));
    }

    #[test]
    fn event_message_wraps_update() {
        let update = FeedUpdate {
            tournament: "Big Rock".to_string(),
            mode: DataSource::Demo,
            events: Vec::new(),
        };
        let Some(json) = event_message(&update) else {
            panic!("expected event message");
        };
        let Ok(msg) = serde_json::from_str::<WsMessage>(&json) else {
            panic!("not an envelope");
        };
        assert_eq!(msg.msg_type, WsMessageType::Event);
        assert_eq!(
            msg.payload.get("tournament").and_then(|v| v.as_str()),
            Some("Big Rock")
        );
        assert_eq!(msg.payload.get("mode").and_then(|v| v.as_str()), Some("demo"));
    }
}
