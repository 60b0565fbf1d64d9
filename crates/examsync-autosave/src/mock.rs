//! Recording transport for tests and dry runs.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::SaveError;
use crate::payload::AutosavePayload;
use crate::transport::SaveTransport;

/// Records every save it receives. Can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct MockTransport {
    calls: Mutex<Vec<(String, AutosavePayload)>>,
    call_count: AtomicU32,
    failing: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every save fails with a network error.
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.set_failing(true);
        transport
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Number of save calls, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Attempt id and payload of every save call, oldest first.
    pub fn calls(&self) -> Vec<(String, AutosavePayload)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_payload(&self) -> Option<AutosavePayload> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|(_, p)| p.clone())
    }
}

#[async_trait]
impl SaveTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn save(&self, attempt_id: &str, payload: &AutosavePayload) -> Result<(), SaveError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((attempt_id.to_string(), payload.clone()));

        if self.failing.load(Ordering::Relaxed) {
            return Err(SaveError::NetworkError("mock transport offline".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls() {
        let transport = MockTransport::new();
        let payload = AutosavePayload {
            answers: vec![],
            client_revision: 3,
        };
        transport.save("a1", &payload).await.unwrap();
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.calls()[0].0, "a1");
        assert_eq!(transport.last_payload(), Some(payload));
    }

    #[tokio::test]
    async fn failing_mode() {
        let transport = MockTransport::failing();
        let payload = AutosavePayload {
            answers: vec![],
            client_revision: 1,
        };
        assert!(transport.save("a1", &payload).await.is_err());
        transport.set_failing(false);
        assert!(transport.save("a1", &payload).await.is_ok());
        assert_eq!(transport.call_count(), 2);
    }
}
