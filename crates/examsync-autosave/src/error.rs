//! Save error types.

use thiserror::Error;

/// Errors a [`SaveTransport`](crate::SaveTransport) can report.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The backend rejected the token (HTTP 401/403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend returned 429.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The backend returned another error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    NetworkError(String),
}

impl SaveError {
    /// Whether a later save of the same attempt cannot succeed without
    /// outside intervention.
    pub fn is_permanent(&self) -> bool {
        match self {
            SaveError::Unauthorized(_) => true,
            SaveError::ApiError { status, .. } => {
                (400..500).contains(status) && *status != 408 && *status != 409
            }
            SaveError::RateLimited { .. } | SaveError::Timeout(_) | SaveError::NetworkError(_) => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence() {
        assert!(SaveError::Unauthorized("nope".into()).is_permanent());
        assert!(SaveError::ApiError {
            status: 404,
            message: "no such attempt".into()
        }
        .is_permanent());
        assert!(!SaveError::ApiError {
            status: 503,
            message: "down".into()
        }
        .is_permanent());
        assert!(!SaveError::RateLimited { retry_after_ms: 1000 }.is_permanent());
        assert!(!SaveError::Timeout(30).is_permanent());
    }

    #[test]
    fn display() {
        let err = SaveError::ApiError {
            status: 422,
            message: "bad revision".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 422): bad revision");
    }
}
