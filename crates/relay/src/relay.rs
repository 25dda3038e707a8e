//! The relay coordinator.
//!
//! One mutex-guarded state object owns the per-connection outbound senders,
//! the presence registry, and the room membership maps. Every inbound event
//! locks the state, mutates it, and fans the resulting server events out
//! before the next event is processed, so each handler sees a consistent
//! snapshot. Delivery is fire-and-forget: a connection whose outbound buffer
//! is full loses the event rather than stalling the relay.

use std::collections::HashMap;

use chrono::{Local, Utc};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::connection::ConnectionId;
use crate::events::{ClientEvent, Message, MessageId, ServerEvent};
use crate::policy;
use crate::presence::PresenceRegistry;
use crate::rooms::RoomMembership;

/// Default depth of a connection's outbound event queue.
pub const DEFAULT_SEND_BUFFER: usize = 100;

pub struct Relay {
    send_buffer: usize,
    inner: Mutex<RelayInner>,
}

#[derive(Default)]
struct RelayInner {
    senders: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    presence: PresenceRegistry,
    rooms: RoomMembership,
}

impl Relay {
    pub fn new(send_buffer: usize) -> Self {
        Self {
            send_buffer,
            inner: Mutex::new(RelayInner::default()),
        }
    }

    /// Attach a new connection. Returns its identity and the receiving end of
    /// its outbound event queue; the gateway drains the receiver into the
    /// socket. Dropping the receiver does not detach the connection —
    /// [`Relay::disconnect`] must be called when the session ends.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let connection = ConnectionId::new();
        let (tx, rx) = mpsc::channel(self.send_buffer);
        self.inner.lock().await.senders.insert(connection, tx);
        info!(%connection, "client connected");
        (connection, rx)
    }

    /// Terminal transition for a connection: its name entry goes away, all
    /// room memberships are cleared, and the updated presence list is
    /// published to everyone still connected.
    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.senders.remove(&connection);
        inner.rooms.clear(connection);
        inner.presence.remove(connection);
        // the original emits the list unconditionally, named or not
        inner.broadcast_presence();
        info!(%connection, "client disconnected");
    }

    /// Single ingress for all client events.
    pub async fn handle(&self, connection: ConnectionId, event: ClientEvent) {
        let mut inner = self.inner.lock().await;
        match event {
            ClientEvent::JoinRoom { room } => inner.join_room(connection, &room),
            ClientEvent::SetUsername { username } => inner.set_username(connection, username),
            ClientEvent::SendMessage {
                username,
                message,
                room,
                file,
                file_type,
                id,
            } => inner.send_message(username, message, room, file, file_type, id),
            ClientEvent::DeleteMessage { id } => inner.delete_message(connection, id),
            ClientEvent::Typing { room, username } => {
                inner.notify_typing(connection, &room, username)
            }
        }
    }

    /// The rooms a connection currently belongs to.
    pub async fn rooms_of(&self, connection: ConnectionId) -> Vec<String> {
        self.inner.lock().await.rooms.rooms_of(connection)
    }
}

impl RelayInner {
    fn join_room(&mut self, connection: ConnectionId, room: &str) {
        if self.rooms.join(connection, room) {
            debug!(%connection, room, "joined room");
        }
    }

    fn set_username(&mut self, connection: ConnectionId, username: String) {
        self.presence.set_name(connection, username);
        self.broadcast_presence();
    }

    fn send_message(
        &mut self,
        username: String,
        message: Option<String>,
        room: String,
        file: Option<String>,
        file_type: Option<String>,
        id: Option<MessageId>,
    ) {
        // never trust client timestamps; ids fall back to epoch millis
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let id = id.unwrap_or_else(|| MessageId::from(Utc::now().timestamp_millis()));

        let (file, file_type) = match (file, file_type) {
            (Some(file), Some(file_type)) if policy::attachment_allowed(&file, &file_type) => {
                (Some(file), Some(file_type))
            }
            (Some(_), Some(file_type)) => {
                debug!(%room, %file_type, "attachment rejected, forwarding text only");
                (None, None)
            }
            _ => (None, None),
        };

        let outgoing = ServerEvent::ReceiveMessage(Message {
            id,
            username,
            message,
            room: room.clone(),
            timestamp,
            file,
            file_type,
        });
        // the sender gets its own message back if it is a member of the room
        self.broadcast_to_room(&room, outgoing, None);
    }

    fn delete_message(&mut self, connection: ConnectionId, id: MessageId) {
        // the request carries no room, so the deletion reaches every room the
        // requester is a member of
        for room in self.rooms.rooms_of(connection) {
            self.broadcast_to_room(&room, ServerEvent::DeleteMessage { id: id.clone() }, None);
        }
    }

    fn notify_typing(&mut self, connection: ConnectionId, room: &str, username: String) {
        self.broadcast_to_room(room, ServerEvent::UserTyping { username }, Some(connection));
    }

    fn broadcast_presence(&self) {
        let event = ServerEvent::OnlineUsers {
            users: self.presence.current_names(),
        };
        for (connection, tx) in &self.senders {
            if let Err(error) = tx.try_send(event.clone()) {
                debug!(%connection, %error, "dropping presence update for connection");
            }
        }
    }

    fn broadcast_to_room(&self, room: &str, event: ServerEvent, except: Option<ConnectionId>) {
        let targets: Vec<ConnectionId> = self
            .rooms
            .members_of(room)
            .filter(|member| Some(*member) != except)
            .collect();
        for connection in targets {
            self.deliver(connection, event.clone());
        }
    }

    fn deliver(&self, connection: ConnectionId, event: ServerEvent) {
        if let Some(tx) = self.senders.get(&connection) {
            if let Err(error) = tx.try_send(event) {
                debug!(%connection, %error, "dropping event for connection");
            }
        }
    }
}
