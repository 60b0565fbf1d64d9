//! Persistence backends for the attempt session store.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::error::SessionError;

/// A string key-value store scoped to one session.
pub trait SessionBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, SessionError>;
}

/// In-process backend; lives as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.keys().cloned().collect())
    }
}

/// Directory-per-session backend.
///
/// Each session gets its own directory under a root; one JSON file per key.
/// Reopening with the same session id resumes it, a new id starts empty,
/// and [`FileBackend::end_session`] discards it.
#[derive(Debug)]
pub struct FileBackend {
    session_id: String,
    dir: PathBuf,
}

impl FileBackend {
    /// Open (or create) the directory for `session_id` under `root`.
    pub fn open(root: &Path, session_id: &str) -> Result<Self, SessionError> {
        if session_id.is_empty()
            || session_id.starts_with('.')
            || encode_key(session_id) != session_id
        {
            return Err(SessionError::InvalidKey(session_id.to_string()));
        }
        let dir = root.join(session_id);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            session_id: session_id.to_string(),
            dir,
        })
    }

    /// Start a fresh session with a random id.
    pub fn new_session(root: &Path) -> Result<Self, SessionError> {
        Self::open(root, &Uuid::new_v4().to_string())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete everything stored for this session.
    pub fn end_session(self) -> Result<(), SessionError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, SessionError> {
        if key.is_empty() {
            return Err(SessionError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", encode_key(key))))
    }
}

impl SessionBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(self.file_path(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let path = self.file_path(key)?;
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        match fs::remove_file(self.file_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, SessionError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            match decode_key(stem) {
                Some(key) => keys.push(key),
                None => debug!(file = %stem, "skipping file with undecodable name"),
            }
        }
        Ok(keys)
    }
}

/// Percent-encode everything outside `[A-Za-z0-9._~-]` so any key is a safe file name.
fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

/// Inverse of [`encode_key`]. Names that `encode_key` could not have produced
/// (stray `%`, lowercase escapes, invalid UTF-8) yield `None`.
fn decode_key(name: &str) -> Option<String> {
    let key = urlencoding::decode(name).ok()?.into_owned();
    (encode_key(&key) == name).then_some(key)
}
