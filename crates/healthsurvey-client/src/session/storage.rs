//! Persistence for the session pair.
//!
//! The session is persisted as two string entries under fixed keys:
//! [`TOKEN_KEY`] holds the bearer token and [`USER_KEY`] holds the user as
//! serialized JSON. Backends write and clear both entries in one operation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StorageError;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// The persisted entries exactly as stored, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSession {
    pub token: Option<String>,
    pub user: Option<String>,
}

impl RawSession {
    fn from_map(mut map: BTreeMap<String, String>) -> Self {
        Self {
            token: map.remove(TOKEN_KEY),
            user: map.remove(USER_KEY),
        }
    }

    fn into_map(self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        if let Some(token) = self.token {
            map.insert(TOKEN_KEY.to_string(), token);
        }
        if let Some(user) = self.user {
            map.insert(USER_KEY.to_string(), user);
        }
        map
    }
}

/// Backend for the persisted session.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<RawSession, StorageError>;

    /// Writes both entries together.
    fn save(&self, token: &str, user_json: &str) -> Result<(), StorageError>;

    /// Removes both entries. Clearing empty storage is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local storage, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<RawSession>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with arbitrary entries (possibly inconsistent).
    pub fn with_entries(token: Option<&str>, user: Option<&str>) -> Self {
        Self {
            entries: Mutex::new(RawSession {
                token: token.map(str::to_string),
                user: user.map(str::to_string),
            }),
        }
    }

    pub fn snapshot(&self) -> RawSession {
        self.entries.lock().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<RawSession, StorageError> {
        Ok(self.entries.lock().clone())
    }

    fn save(&self, token: &str, user_json: &str) -> Result<(), StorageError> {
        *self.entries.lock() = RawSession {
            token: Some(token.to_string()),
            user: Some(user_json.to_string()),
        };
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.entries.lock() = RawSession::default();
        Ok(())
    }
}

/// One JSON file per profile under the client's state directory
/// (`~/.healthsurvey/session.<profile>.json` by default).
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for `profile` inside `dir`, or inside `~/.healthsurvey` when
    /// `dir` is `None`.
    pub fn for_profile(dir: Option<&Path>, profile: &str) -> Result<Self, StorageError> {
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => default_state_dir()?,
        };
        Ok(Self::new(dir.join(format!("session.{profile}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_state_dir() -> Result<PathBuf, StorageError> {
    Ok(dirs::home_dir()
        .ok_or(StorageError::NoStateDir)?
        .join(".healthsurvey"))
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<RawSession, StorageError> {
        if !self.path.exists() {
            return Ok(RawSession::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let map: BTreeMap<String, String> = serde_json::from_str(&content)?;
        Ok(RawSession::from_map(map))
    }

    fn save(&self, token: &str, user_json: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let map = RawSession {
            token: Some(token.to_string()),
            user: Some(user_json.to_string()),
        }
        .into_map();
        let content = serde_json::to_string_pretty(&map)?;
        // Replace in one rename: readers see both keys or neither.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trip_and_clear() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let storage = FileStorage::for_profile(Some(dir.path()), "default").unwrap();
        assert_eq!(storage.load().unwrap(), RawSession::default());

        storage.save("abc123", r#"{"id":1}"#).unwrap();
        let raw = storage.load().unwrap();
        assert_eq!(raw.token.as_deref(), Some("abc123"));
        assert_eq!(raw.user.as_deref(), Some(r#"{"id":1}"#));

        storage.clear().unwrap();
        assert!(!storage.path().exists());
        storage.clear().unwrap();
    }

    #[test]
    fn file_storage_uses_fixed_keys() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let storage = FileStorage::for_profile(Some(dir.path()), "staging").unwrap();
        storage.save("t", "{}").unwrap();
        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(on_disk.keys().collect::<Vec<_>>(), vec!["token", "user"]);
        assert!(storage.path().ends_with("session.staging.json"));
    }

    #[test]
    fn memory_storage_clear_removes_both() {
        let storage = MemoryStorage::with_entries(Some("t"), None);
        storage.clear().unwrap();
        assert_eq!(storage.snapshot(), RawSession::default());
    }
}
