//! The seam between the scheduler and the save API.

use async_trait::async_trait;

use crate::error::SaveError;
use crate::payload::AutosavePayload;

/// Delivers an autosave payload for one attempt.
#[async_trait]
pub trait SaveTransport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn save(&self, attempt_id: &str, payload: &AutosavePayload) -> Result<(), SaveError>;
}
