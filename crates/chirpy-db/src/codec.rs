//! Snapshot <-> bytes, and the file I/O around it.
//!
//! Every write is a full rewrite: the snapshot is written to a sibling temp
//! file, synced, then renamed over the data file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pretty-printed JSON. Collections are ordered maps, so output is stable.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec_pretty(snapshot).map_err(CodecError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Snapshot, CodecError> {
    let mut snapshot: Snapshot = serde_json::from_slice(bytes).map_err(CodecError::Decode)?;
    snapshot.normalize();
    Ok(snapshot)
}

pub fn read_file(path: &Path) -> Result<Snapshot, CodecError> {
    let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
    decode(&bytes)
}

pub fn write_file(path: &Path, snapshot: &Snapshot) -> Result<(), CodecError> {
    let bytes = encode(snapshot)?;
    let tmp = temp_path(path);

    let result = write_synced(&tmp, &bytes)
        .and_then(|()| fs::rename(&tmp, path).map_err(|source| io_error(path, source)));

    if result.is_err() {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_synced(tmp: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let mut file = fs::File::create(tmp).map_err(|source| io_error(tmp, source))?;
    file.write_all(bytes).map_err(|source| io_error(tmp, source))?;
    file.sync_all().map_err(|source| io_error(tmp, source))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> CodecError {
    CodecError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChirpSlot, UserRecord};
    use chirpy_types::models::Chirp;

    fn sample() -> Snapshot {
        let mut snap = Snapshot::default();
        snap.data.chirps.insert(
            1,
            ChirpSlot::Present(Chirp {
                id: 1,
                body: "hello".into(),
                author_id: 1,
            }),
        );
        snap.data.chirps.insert(2, ChirpSlot::Tombstoned);
        snap.data.users.insert(
            1,
            UserRecord {
                id: 1,
                email: "a@b.com".into(),
                password_hash: "$argon2id$v=19$stub".into(),
                refresh_token: "ff".into(),
                is_chirpy_red: true,
            },
        );
        snap.sequences.chirps = 2;
        snap.sequences.users = 1;
        snap
    }

    #[test]
    fn file_layout_matches_documented_shape() {
        let bytes = encode(&sample()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["data"]["chirps"]["1"]["state"], "present");
        assert_eq!(json["data"]["chirps"]["1"]["body"], "hello");
        assert_eq!(json["data"]["chirps"]["2"]["state"], "tombstoned");
        assert_eq!(json["data"]["users"]["1"]["password"], "$argon2id$v=19$stub");
        assert_eq!(json["sequences"]["chirps"], 2);

        // Pretty-printed
        assert!(bytes.contains(&b'\n'));
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode(&sample()).unwrap(), encode(&sample()).unwrap());
    }

    #[test]
    fn decode_accepts_file_without_sequences() {
        let raw = br#"{"data":{"chirps":{"3":{"state":"present","id":3,"body":"x","author_id":1}},"users":{}}}"#;
        let snap = decode(raw).unwrap();
        assert_eq!(snap.sequences.chirps, 3);
        assert_eq!(snap.sequences.users, 0);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"{not json"), Err(CodecError::Decode(_))));
    }

    #[test]
    fn file_roundtrip_leaves_no_temp_file() {
        let dir = std::env::temp_dir().join(format!("chirpy-codec-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("database.json");

        write_file(&path, &sample()).unwrap();
        assert_eq!(read_file(&path).unwrap(), sample());
        assert!(!temp_path(&path).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = std::env::temp_dir().join(format!("chirpy-codec-{}", uuid::Uuid::new_v4()));
        // A directory squatting on the data file's name makes the rename fail.
        let path = dir.join("database.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let result = write_file(&path, &sample());
        assert!(matches!(result, Err(CodecError::Io { .. })));
        assert!(!temp_path(&path).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("chirpy-missing-{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(read_file(&path), Err(CodecError::Io { .. })));
    }
}
