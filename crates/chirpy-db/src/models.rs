//! Persisted record types. These map directly to entries in the data file.
//! Distinct from chirpy-types API models so the public view can never leak
//! the password hash.

use std::collections::BTreeMap;

use chirpy_types::models::{Chirp, UserView};
use serde::{Deserialize, Serialize};

/// One key of the chirp collection. Deleted chirps leave a tombstone so the
/// key is never handed out again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChirpSlot {
    Present(Chirp),
    Tombstoned,
}

impl ChirpSlot {
    pub fn live(&self) -> Option<&Chirp> {
        match self {
            ChirpSlot::Present(chirp) => Some(chirp),
            ChirpSlot::Tombstoned => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Empty when the user has no active session.
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub is_chirpy_red: bool,
}

impl UserRecord {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            is_chirpy_red: self.is_chirpy_red,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub chirps: BTreeMap<u64, ChirpSlot>,
    #[serde(default)]
    pub users: BTreeMap<u64, UserRecord>,
}

/// Last id handed out per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequences {
    #[serde(default)]
    pub chirps: u64,
    #[serde(default)]
    pub users: u64,
}

/// The complete dataset, exactly as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub data: Collections,
    #[serde(default)]
    pub sequences: Sequences,
}

impl Snapshot {
    /// Raise each counter to at least the highest key present. Files written
    /// before counters existed, or edited by hand, cannot make ids collide.
    pub fn normalize(&mut self) {
        if let Some(&max) = self.data.chirps.keys().next_back() {
            self.sequences.chirps = self.sequences.chirps.max(max);
        }
        if let Some(&max) = self.data.users.keys().next_back() {
            self.sequences.users = self.sequences.users.max(max);
        }
    }

    pub fn next_chirp_id(&mut self) -> u64 {
        self.sequences.chirps += 1;
        self.sequences.chirps
    }

    pub fn next_user_id(&mut self) -> u64 {
        self.sequences.users += 1;
        self.sequences.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_raises_stale_counters() {
        let mut snap = Snapshot::default();
        snap.data.chirps.insert(4, ChirpSlot::Tombstoned);
        snap.data.users.insert(
            2,
            UserRecord {
                id: 2,
                email: "a@b.com".into(),
                password_hash: "x".into(),
                refresh_token: String::new(),
                is_chirpy_red: false,
            },
        );
        snap.sequences.users = 9;

        snap.normalize();
        assert_eq!(snap.sequences.chirps, 4);
        assert_eq!(snap.sequences.users, 9);
        assert_eq!(snap.next_chirp_id(), 5);
        assert_eq!(snap.next_user_id(), 10);
    }

    #[test]
    fn view_drops_secrets() {
        let user = UserRecord {
            id: 1,
            email: "a@b.com".into(),
            password_hash: "$argon2id$...".into(),
            refresh_token: "abc".into(),
            is_chirpy_red: true,
        };
        let view = user.view();
        assert_eq!(view.id, 1);
        assert_eq!(view.email, "a@b.com");
        assert!(view.is_chirpy_red);
    }
}
