//! Chat and presence events exchanged between collaborators.
//!
//! Transport is out of scope here; events travel over an in-process
//! broadcast bus that a socket adapter can subscribe to.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error};
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_CAPACITY: usize = 64;

/// One chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub message: String,
    pub username: String,
    pub timestamp: String,
}

impl ChatMessage {
    /// Compose a message from raw input; blank input yields nothing.
    pub fn compose(username: &str, input: &str) -> Option<Self> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            username: username.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}

/// Payload announcing that a user opened a video call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStarted {
    pub username: String,
    pub room_id: String,
}

/// Events on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum SocketEvent {
    #[serde(rename = "send-message")]
    SendMessage { message: ChatMessage },

    #[serde(rename = "video-call-started")]
    VideoCallStarted(CallStarted),
}

/// Text shown to `current_user` for a call announcement, if any.
pub fn call_started_notice(event: &CallStarted, current_user: &str) -> Option<String> {
    (event.username != current_user).then(|| format!("{} started a video call", event.username))
}

/// Fan-out of socket events to every subscriber.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SocketEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SocketEvent> {
        self.tx.subscribe()
    }

    /// Publish `event`; having no subscribers is not an error.
    pub fn emit(&self, event: SocketEvent) {
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "Event emitted"),
            Err(_) => debug!("Event emitted with no subscribers"),
        }
    }

    /// Compose and publish a chat message.
    pub fn send_message(&self, username: &str, input: &str) -> Option<ChatMessage> {
        let message = ChatMessage::compose(username, input)?;
        self.emit(SocketEvent::SendMessage {
            message: message.clone(),
        });
        Some(message)
    }

    /// Announce a call in `room_id`; both fields must be non-empty.
    pub fn start_call(&self, username: &str, room_id: &str) -> Option<CallStarted> {
        if username.trim().is_empty() || room_id.trim().is_empty() {
            error!("Missing required information for video call");
            return None;
        }
        let started = CallStarted {
            username: username.to_string(),
            room_id: room_id.to_string(),
        };
        self.emit(SocketEvent::VideoCallStarted(started.clone()));
        Some(started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_composes_nothing() {
        assert!(ChatMessage::compose("ada", "").is_none());
        assert!(ChatMessage::compose("ada", "   \n").is_none());
    }

    #[test]
    fn test_compose_trims_and_assigns_ids() {
        let a = ChatMessage::compose("ada", "  hi  ").unwrap();
        let b = ChatMessage::compose("ada", "hi").unwrap();
        assert_eq!(a.message, "hi");
        assert_eq!(a.username, "ada");
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert_eq!(a.timestamp.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn test_wire_names() {
        let event = SocketEvent::VideoCallStarted(CallStarted {
            username: "ada".to_string(),
            room_id: "r1".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "video-call-started");
        assert_eq!(json["payload"]["roomId"], "r1");

        let message = ChatMessage::compose("ada", "hello").unwrap();
        let json = serde_json::to_value(SocketEvent::SendMessage { message }).unwrap();
        assert_eq!(json["event"], "send-message");
        assert_eq!(json["payload"]["message"]["message"], "hello");
    }

    #[test]
    fn test_notice_only_for_other_users() {
        let event = CallStarted {
            username: "ada".to_string(),
            room_id: "r1".to_string(),
        };
        assert_eq!(
            call_started_notice(&event, "grace").as_deref(),
            Some("ada started a video call")
        );
        assert_eq!(call_started_notice(&event, "ada"), None);
    }

    #[tokio::test]
    async fn test_bus_delivers_to_subscribers() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let sent = bus.send_message("ada", "hello").unwrap();
        assert!(bus.send_message("ada", " ").is_none());
        bus.start_call("ada", "room-7").unwrap();

        assert_eq!(rx.recv().await.unwrap(), SocketEvent::SendMessage { message: sent });
        match rx.recv().await.unwrap() {
            SocketEvent::VideoCallStarted(started) => assert_eq!(started.room_id, "room-7"),
            other => panic!("unexpected event {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_start_call_requires_room_and_user() {
        let bus = EventBus::default();
        assert!(bus.start_call("", "room").is_none());
        assert!(bus.start_call("ada", "").is_none());
    }

    #[test]
    fn test_emit_without_subscribers() {
        EventBus::new(4).emit(SocketEvent::VideoCallStarted(CallStarted {
            username: "ada".to_string(),
            room_id: "r".to_string(),
        }));
    }
}
