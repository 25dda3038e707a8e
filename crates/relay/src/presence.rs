//! Online-user presence.

use crate::connection::ConnectionId;

/// Maps connections to their chosen display names, in registration order.
///
/// Names are not deduplicated: two connections registering the same name
/// both appear in the presence list. Overwriting a name keeps the
/// connection's original position.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: Vec<(ConnectionId, String)>,
}

impl PresenceRegistry {
    /// Record or overwrite the display name for a connection. Last write wins.
    pub fn set_name(&mut self, connection: ConnectionId, name: impl Into<String>) {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|(id, _)| *id == connection)
        {
            Some(entry) => entry.1 = name,
            None => self.entries.push((connection, name)),
        }
    }

    /// Delete the entry for a connection, if any. Returns whether one existed.
    pub fn remove(&mut self, connection: ConnectionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != connection);
        self.entries.len() != before
    }

    /// All registered names, in registration order, duplicates included.
    pub fn current_names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, name)| name.clone()).collect()
    }
}
