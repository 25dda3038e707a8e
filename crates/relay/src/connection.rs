//! Connection identity.

use std::fmt;

use uuid::Uuid;

/// Opaque identity for one client's live network session.
///
/// Issued when the gateway attaches a connection to the relay and never
/// reused; the relay only ever treats it as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
