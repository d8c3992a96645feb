pub mod codec;
pub mod models;
pub mod queries;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{error, info};

use chirpy_crypto::CredentialError;

use crate::codec::CodecError;
use crate::models::Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record belongs to another author")]
    Forbidden,

    #[error("persistence failed: {0}")]
    Persistence(#[from] CodecError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// In-memory dataset plus the refresh-token index derived from it.
#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    pub(crate) snapshot: Snapshot,
    /// refresh token -> user id. Rebuilt on load, updated on every token
    /// mutation.
    pub(crate) refresh_index: HashMap<String, u64>,
}

impl State {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let refresh_index = snapshot
            .data
            .users
            .values()
            .filter(|u| !u.refresh_token.is_empty())
            .map(|u| (u.refresh_token.clone(), u.id))
            .collect();
        Self {
            snapshot,
            refresh_index,
        }
    }
}

/// Single-file record store for chirps and users.
///
/// One lock covers both collections. Mutations run against a working copy,
/// which is committed to memory only after the full snapshot has reached disk.
pub struct Database {
    path: PathBuf,
    state: RwLock<State>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            codec::write_file(path, &Snapshot::default())?;
            info!("Created empty database at {}", path.display());
        }

        let snapshot = codec::read_file(path)?;
        info!(
            chirps = snapshot.data.chirps.len(),
            users = snapshot.data.users.len(),
            "Database opened at {}",
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            state: RwLock::new(State::from_snapshot(snapshot)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current dataset.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.with_read(|state| Ok(state.snapshot.clone()))
    }

    pub(crate) fn with_read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&State) -> Result<T>,
    {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        f(&state)
    }

    /// Run a mutation under the write lock. If `f` fails nothing is written;
    /// if the write fails the in-memory state is left as it was.
    pub(crate) fn with_write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut State) -> Result<T>,
    {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut working = state.clone();
        let out = f(&mut working)?;

        if let Err(e) = codec::write_file(&self.path, &working.snapshot) {
            error!("Failed to persist database to {}: {}", self.path.display(), e);
            return Err(e.into());
        }

        *state = working;
        Ok(out)
    }
}
