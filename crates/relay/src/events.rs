//! Wire event types for the relay.
//!
//! Events travel as internally tagged JSON objects; the tag values are the
//! event names of the protocol (`join_room`, `receive_message`, ...).
//! Payload field names keep the client's casing, notably `fileType`.

use serde::{Deserialize, Serialize};

/// Message identifier as it appears on the wire.
///
/// Clients generate ids like `Date.now() + Math.random()`, so both strings
/// and numbers must round-trip unchanged. Collisions are not guarded
/// against; a duplicate id makes deletion ambiguous on the client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Text(String),
    Number(serde_json::Number),
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Events received from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join a named room. Idempotent.
    JoinRoom { room: String },
    /// Set or overwrite the display name for this connection.
    SetUsername { username: String },
    /// Send a chat message, optionally with an encoded file attachment.
    SendMessage {
        username: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        room: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<String>,
        #[serde(
            default,
            rename = "fileType",
            skip_serializing_if = "Option::is_none"
        )]
        file_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<MessageId>,
    },
    /// Ask every room this connection is in to drop the message with `id`.
    DeleteMessage { id: MessageId },
    /// Ephemeral typing signal for a room.
    Typing { room: String, username: String },
}

/// Events sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full presence list, sent to every connection on any change.
    OnlineUsers { users: Vec<String> },
    /// A normalized chat message, sent to every member of its room.
    ReceiveMessage(Message),
    /// Deletion request fan-out; receivers drop the matching message locally.
    DeleteMessage { id: MessageId },
    /// Typing indicator, sent to room members except the typist.
    UserTyping { username: String },
}

/// A normalized in-flight chat message.
///
/// Created by the relay on receipt of a send request and never stored;
/// `timestamp` and (when the client omitted one) `id` are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub room: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(
        default,
        rename = "fileType",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_events_use_protocol_names() {
        let event = ClientEvent::JoinRoom {
            room: "general".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "join_room", "room": "general"})
        );

        let event: ClientEvent = serde_json::from_value(json!({
            "type": "typing",
            "room": "general",
            "username": "alice"
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::Typing {
                room: "general".to_string(),
                username: "alice".to_string(),
            }
        );
    }

    #[test]
    fn send_message_keeps_client_field_casing_and_optionals() {
        let event: ClientEvent = serde_json::from_value(json!({
            "type": "send_message",
            "username": "alice",
            "room": "general",
            "file": "data:image/png;base64,AAAA",
            "fileType": "image/png"
        }))
        .unwrap();

        match event {
            ClientEvent::SendMessage {
                message,
                file_type,
                id,
                ..
            } => {
                assert_eq!(message, None);
                assert_eq!(file_type.as_deref(), Some("image/png"));
                assert_eq!(id, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn message_id_accepts_strings_and_numbers() {
        let text: MessageId = serde_json::from_value(json!("abc-1")).unwrap();
        assert_eq!(text, MessageId::Text("abc-1".to_string()));

        let number: MessageId = serde_json::from_value(json!(1719922133.52)).unwrap();
        assert_eq!(serde_json::to_value(&number).unwrap(), json!(1719922133.52));
    }

    #[test]
    fn receive_message_serializes_flat_with_tag() {
        let event = ServerEvent::ReceiveMessage(Message {
            id: MessageId::from(1),
            username: "alice".to_string(),
            message: Some("hi".to_string()),
            room: "general".to_string(),
            timestamp: "10:15:00".to_string(),
            file: None,
            file_type: None,
        });

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "receive_message",
                "id": 1,
                "username": "alice",
                "message": "hi",
                "room": "general",
                "timestamp": "10:15:00"
            })
        );
    }
}
