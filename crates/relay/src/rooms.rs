//! Room membership.

use std::collections::{HashMap, HashSet};

use crate::connection::ConnectionId;

/// Tracks which connections belong to which rooms.
///
/// Both directions are kept so that room fan-out and per-connection cleanup
/// are cheap; the two maps are only ever mutated together, under the relay's
/// lock, so they cannot diverge.
#[derive(Debug, Default)]
pub struct RoomMembership {
    members: HashMap<String, HashSet<ConnectionId>>,
    joined: HashMap<ConnectionId, HashSet<String>>,
}

impl RoomMembership {
    /// Add a connection to a room. Idempotent; returns whether membership
    /// actually changed.
    pub fn join(&mut self, connection: ConnectionId, room: &str) -> bool {
        let inserted = self
            .members
            .entry(room.to_string())
            .or_default()
            .insert(connection);
        if inserted {
            self.joined
                .entry(connection)
                .or_default()
                .insert(room.to_string());
        }
        inserted
    }

    /// Current members of a room. An unknown room yields nothing.
    pub fn members_of<'a>(&'a self, room: &str) -> impl Iterator<Item = ConnectionId> + 'a {
        self.members.get(room).into_iter().flatten().copied()
    }

    /// All rooms the connection currently belongs to.
    pub fn rooms_of(&self, connection: ConnectionId) -> Vec<String> {
        self.joined
            .get(&connection)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop the connection from every room it joined. There is no partial
    /// leave; this runs on disconnect only.
    pub fn clear(&mut self, connection: ConnectionId) {
        if let Some(rooms) = self.joined.remove(&connection) {
            for room in rooms {
                if let Some(members) = self.members.get_mut(&room) {
                    members.remove(&connection);
                    if members.is_empty() {
                        self.members.remove(&room);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_idempotent() {
        let mut rooms = RoomMembership::default();
        let c = ConnectionId::new();

        assert!(rooms.join(c, "general"));
        assert!(!rooms.join(c, "general"));

        assert_eq!(rooms.rooms_of(c), vec!["general".to_string()]);
        assert_eq!(rooms.members_of("general").count(), 1);
    }

    #[test]
    fn a_connection_may_hold_multiple_rooms() {
        let mut rooms = RoomMembership::default();
        let c = ConnectionId::new();

        rooms.join(c, "general");
        rooms.join(c, "random");

        let mut joined = rooms.rooms_of(c);
        joined.sort();
        assert_eq!(joined, vec!["general".to_string(), "random".to_string()]);
    }

    #[test]
    fn clear_removes_both_directions() {
        let mut rooms = RoomMembership::default();
        let c = ConnectionId::new();
        let other = ConnectionId::new();

        rooms.join(c, "general");
        rooms.join(other, "general");
        rooms.join(c, "random");

        rooms.clear(c);

        assert!(rooms.rooms_of(c).is_empty());
        assert_eq!(
            rooms.members_of("general").collect::<Vec<_>>(),
            vec![other]
        );
        // "random" had no other members and is gone entirely
        assert_eq!(rooms.members_of("random").count(), 0);
    }
}
