//! Room-scoped real-time messaging and presence coordinator.
//!
//! The relay tracks which connection belongs to which room and display name,
//! fans messages, typing signals, and deletion events out to the right subset
//! of connections, and enforces the attachment safety rules. It holds no
//! message history and performs no I/O of its own; the gateway crate owns the
//! sockets and hands parsed events in.

pub mod connection;
pub mod events;
pub mod policy;
pub mod presence;
pub mod relay;
pub mod rooms;

pub use connection::ConnectionId;
pub use events::{ClientEvent, Message, MessageId, ServerEvent};
pub use relay::{Relay, DEFAULT_SEND_BUFFER};
