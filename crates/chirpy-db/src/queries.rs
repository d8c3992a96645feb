use chirpy_crypto::CredentialError;
use chirpy_crypto::password::{hash_password, verify_password};
use chirpy_types::models::{Chirp, SortOrder, UserView};
use tracing::{debug, warn};

use crate::models::{ChirpSlot, UserRecord};
use crate::{Database, Result, StoreError};

impl Database {
    // -- Chirps --

    pub fn create_post(&self, body: &str, author_id: u64) -> Result<Chirp> {
        self.with_write(|state| {
            let id = state.snapshot.next_chirp_id();
            let chirp = Chirp {
                id,
                body: body.to_string(),
                author_id,
            };
            state
                .snapshot
                .data
                .chirps
                .insert(id, ChirpSlot::Present(chirp.clone()));
            debug!(chirp_id = id, author_id, "Chirp created");
            Ok(chirp)
        })
    }

    /// Tombstone a chirp. Only its author may delete it.
    pub fn delete_post(&self, author_id: u64, post_id: u64) -> Result<()> {
        self.with_write(|state| {
            let slot = state
                .snapshot
                .data
                .chirps
                .get_mut(&post_id)
                .ok_or(StoreError::NotFound)?;

            let chirp = slot.live().ok_or(StoreError::NotFound)?;
            if chirp.author_id != author_id {
                return Err(StoreError::Forbidden);
            }

            *slot = ChirpSlot::Tombstoned;
            debug!(chirp_id = post_id, author_id, "Chirp tombstoned");
            Ok(())
        })
    }

    pub fn get_post_by_id(&self, id: u64) -> Result<Chirp> {
        self.with_read(|state| {
            state
                .snapshot
                .data
                .chirps
                .get(&id)
                .and_then(ChirpSlot::live)
                .cloned()
                .ok_or(StoreError::NotFound)
        })
    }

    /// Live chirps, optionally restricted to one author, ordered by id.
    pub fn list_posts(&self, author_id: Option<u64>, order: SortOrder) -> Result<Vec<Chirp>> {
        self.with_read(|state| {
            let mut chirps: Vec<Chirp> = state
                .snapshot
                .data
                .chirps
                .values()
                .filter_map(ChirpSlot::live)
                .filter(|c| author_id.is_none_or(|a| c.author_id == a))
                .cloned()
                .collect();

            if order == SortOrder::Desc {
                chirps.reverse();
            }
            Ok(chirps)
        })
    }

    // -- Users --

    pub fn create_user(&self, email: &str, password: &str) -> Result<UserView> {
        // Hash outside the lock; Argon2 is deliberately slow.
        let password_hash = hash_password(password)?;

        self.with_write(|state| {
            let id = state.snapshot.next_user_id();
            let user = UserRecord {
                id,
                email: email.to_string(),
                password_hash,
                refresh_token: String::new(),
                is_chirpy_red: false,
            };
            let view = user.view();
            state.snapshot.data.users.insert(id, user);
            debug!(user_id = id, "User created");
            Ok(view)
        })
    }

    pub fn get_user(&self, id: u64) -> Result<Option<UserView>> {
        self.with_read(|state| Ok(state.snapshot.data.users.get(&id).map(UserRecord::view)))
    }

    /// `Some(true)` while the user holds a refresh token, `None` if no such user.
    pub fn has_active_session(&self, id: u64) -> Result<Option<bool>> {
        self.with_read(|state| {
            Ok(state
                .snapshot
                .data
                .users
                .get(&id)
                .map(|u| !u.refresh_token.is_empty()))
        })
    }

    /// First user, in id order, whose stored hash accepts `password`.
    pub fn authenticate_user(&self, password: &str) -> Result<Option<UserView>> {
        self.authenticate_with(password, verify_password)
    }

    /// Hashes are copied out under the read lock and verified after it is
    /// released, so slow verification never stalls writers.
    fn authenticate_with<V>(&self, password: &str, verify: V) -> Result<Option<UserView>>
    where
        V: Fn(&str, &str) -> std::result::Result<bool, CredentialError>,
    {
        let candidates: Vec<(UserView, String)> = self.with_read(|state| {
            Ok(state
                .snapshot
                .data
                .users
                .values()
                .map(|u| (u.view(), u.password_hash.clone()))
                .collect())
        })?;

        for (view, hash) in candidates {
            match verify(&hash, password) {
                Ok(true) => return Ok(Some(view)),
                Ok(false) => {}
                Err(e) => warn!(user_id = view.id, "Skipping user with unusable hash: {}", e),
            }
        }
        Ok(None)
    }

    /// Replace email and password. Refresh token and upgrade flag are kept.
    pub fn update_user(&self, id: u64, email: &str, password: &str) -> Result<Option<UserView>> {
        if self.get_user(id)?.is_none() {
            return Ok(None);
        }
        let password_hash = hash_password(password)?;

        let updated = self.with_write(|state| {
            let user = state
                .snapshot
                .data
                .users
                .get_mut(&id)
                .ok_or(StoreError::NotFound)?;
            user.email = email.to_string();
            user.password_hash = password_hash;
            debug!(user_id = id, "User updated");
            Ok(user.view())
        });

        not_found_as_none(updated)
    }

    pub fn set_refresh_token(&self, user_id: u64, token: &str) -> Result<()> {
        self.with_write(|state| {
            let user = state
                .snapshot
                .data
                .users
                .get_mut(&user_id)
                .ok_or(StoreError::NotFound)?;

            let previous = std::mem::replace(&mut user.refresh_token, token.to_string());
            if !previous.is_empty() {
                state.refresh_index.remove(&previous);
            }
            if !token.is_empty() {
                if let Some(other) = state.refresh_index.insert(token.to_string(), user_id) {
                    if other != user_id {
                        warn!(user_id, other, "Refresh token collision, previous owner displaced");
                        if let Some(o) = state.snapshot.data.users.get_mut(&other) {
                            o.refresh_token.clear();
                        }
                    }
                }
            }
            debug!(user_id, "Refresh token set");
            Ok(())
        })
    }

    pub fn find_user_id_by_refresh_token(&self, token: &str) -> Result<Option<u64>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.with_read(|state| Ok(state.refresh_index.get(token).copied()))
    }

    /// Clear the session holding `token`. `false` if no user holds it.
    pub fn revoke_refresh_token(&self, token: &str) -> Result<bool> {
        if token.is_empty() {
            return Ok(false);
        }

        let revoked = self.with_write(|state| {
            let user_id = state
                .refresh_index
                .remove(token)
                .ok_or(StoreError::NotFound)?;
            if let Some(user) = state.snapshot.data.users.get_mut(&user_id) {
                user.refresh_token.clear();
            }
            debug!(user_id, "Refresh token revoked");
            Ok(())
        });

        Ok(not_found_as_none(revoked)?.is_some())
    }

    /// Mark a user as Chirpy Red. Idempotent; the flag never reverts.
    pub fn upgrade_user(&self, user_id: u64) -> Result<()> {
        self.with_write(|state| {
            let user = state
                .snapshot
                .data
                .users
                .get_mut(&user_id)
                .ok_or(StoreError::NotFound)?;
            user.is_chirpy_red = true;
            debug!(user_id, "User upgraded");
            Ok(())
        })
    }
}

fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(StoreError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
