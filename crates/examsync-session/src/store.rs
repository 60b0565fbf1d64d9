//! Keyed store of in-progress attempts.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use examsync_core::model::{AttemptRecord, AttemptStartPayload};

use crate::backend::SessionBackend;
use crate::error::SessionError;

/// Key prefix for persisted attempts.
pub const DEFAULT_NAMESPACE: &str = "examsync.attempt";

/// Attempt id → record, mirrored into a session-scoped backend.
///
/// The store is the only owner of registered records; callers read them
/// through [`get`](Self::get) and replace them through [`set`](Self::set).
pub struct AttemptSessionStore {
    namespace: String,
    records: HashMap<String, AttemptRecord>,
    backend: Arc<dyn SessionBackend>,
}

impl AttemptSessionStore {
    /// Open a store under [`DEFAULT_NAMESPACE`], loading every persisted attempt.
    pub fn open(backend: Arc<dyn SessionBackend>) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(backend: Arc<dyn SessionBackend>, namespace: &str) -> Self {
        let mut store = Self {
            namespace: namespace.to_string(),
            records: HashMap::new(),
            backend,
        };
        store.load_all();
        store
    }

    fn key(&self, attempt_id: &str) -> String {
        format!("{}:{}", self.namespace, attempt_id)
    }

    fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    fn namespaced_keys(&self) -> Result<Vec<String>, SessionError> {
        let prefix = self.prefix();
        Ok(self
            .backend
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect())
    }

    fn read(&self, key: &str) -> Option<AttemptRecord> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%key, error = %e, "failed to read persisted attempt");
                return None;
            }
        };
        match serde_json::from_str::<AttemptRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%key, error = %e, "skipping unreadable persisted attempt");
                None
            }
        }
    }

    fn load_all(&mut self) {
        let keys = match self.namespaced_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "could not list persisted attempts");
                return;
            }
        };

        for key in keys {
            if let Some(record) = self.read(&key) {
                self.records.insert(record.attempt_id.clone(), record);
            }
        }
        if !self.records.is_empty() {
            info!(count = self.records.len(), "resumed persisted attempts");
        }
    }

    /// Insert or replace a record and persist it.
    ///
    /// The in-memory copy is updated even when persisting fails.
    pub fn set(&mut self, record: AttemptRecord) -> Result<(), SessionError> {
        if record.attempt_id.is_empty() {
            return Err(SessionError::InvalidKey(record.attempt_id));
        }
        let key = self.key(&record.attempt_id);
        let json = serde_json::to_string(&record)?;
        debug!(attempt = %record.attempt_id, "registering attempt");
        self.records.insert(record.attempt_id.clone(), record);
        self.backend.set(&key, &json)
    }

    /// Validate an attempt-start payload and register the resulting record.
    pub fn start(&mut self, payload: AttemptStartPayload) -> Result<&AttemptRecord, SessionError> {
        let record = AttemptRecord::from_start(payload)?;
        let attempt_id = record.attempt_id.clone();
        info!(attempt = %attempt_id, sections = record.sections.len(), "attempt started");
        self.set(record)?;
        self.records
            .get(&attempt_id)
            .ok_or(SessionError::InvalidKey(attempt_id))
    }

    /// Look up an attempt, falling back to persisted storage.
    pub fn get(&mut self, attempt_id: &str) -> Option<&AttemptRecord> {
        if !self.records.contains_key(attempt_id) {
            let record = self.read(&self.key(attempt_id))?;
            debug!(attempt = %attempt_id, "loaded attempt from persisted storage");
            self.records.insert(attempt_id.to_string(), record);
        }
        self.records.get(attempt_id)
    }

    /// Remove one attempt, or every attempt in this namespace when `attempt_id` is `None`.
    pub fn clear(&mut self, attempt_id: Option<&str>) -> Result<(), SessionError> {
        match attempt_id {
            Some(id) => {
                self.records.remove(id);
                self.backend.remove(&self.key(id))
            }
            None => {
                self.records.clear();
                for key in self.namespaced_keys()? {
                    self.backend.remove(&key)?;
                }
                Ok(())
            }
        }
    }

    /// Ids of attempts currently held in memory, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}
