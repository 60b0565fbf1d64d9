//! HTTP save transport for the exam backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::SaveError;
use crate::payload::AutosavePayload;
use crate::transport::SaveTransport;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Posts payloads to `{base_url}/attempts/{attempt_id}/autosave`.
pub struct HttpTransport {
    base_url: String,
    api_token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, SaveError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SaveError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            timeout_secs,
            client,
        })
    }

    /// The attempt id is sent as a single escaped path segment.
    fn endpoint(&self, attempt_id: &str) -> String {
        format!(
            "{}/attempts/{}/autosave",
            self.base_url,
            urlencoding::encode(attempt_id)
        )
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[async_trait]
impl SaveTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, payload), fields(answers = payload.answers.len(), revision = payload.client_revision))]
    async fn save(&self, attempt_id: &str, payload: &AutosavePayload) -> Result<(), SaveError> {
        let mut request = self.client.post(self.endpoint(attempt_id)).json(payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SaveError::Timeout(self.timeout_secs)
            } else {
                SaveError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(SaveError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(SaveError::Unauthorized(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(SaveError::ApiError { status, message });
        }

        debug!(status, "autosave accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::AnswerEntry;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> AutosavePayload {
        AutosavePayload {
            answers: vec![AnswerEntry {
                question_id: "q1".into(),
                section_id: "s1".into(),
                selected_values: vec!["Paris".into()],
            }],
            client_revision: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn posts_payload_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts/a-1/autosave"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(serde_json::json!({
                "answers": [{"questionId": "q1", "sectionId": "s1", "selectedValues": ["Paris"]}],
                "clientRevision": 1_700_000_000_000_i64
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(&format!("{}/", server.uri()), Some("secret".into()), 5).unwrap();
        transport.save("a-1", &payload()).await.unwrap();
    }

    #[tokio::test]
    async fn attempt_id_is_escaped_into_one_segment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/attempts/a%2Fb%3Fx%23y/autosave"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), None, 5).unwrap();
        transport.save("a/b?x#y", &payload()).await.unwrap();
    }

    #[test]
    fn endpoint_keeps_plain_ids_readable() {
        let transport = HttpTransport::new("http://localhost/api/", None, 5).unwrap();
        assert_eq!(
            transport.endpoint("att-001"),
            "http://localhost/api/attempts/att-001/autosave"
        );
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), Some("old".into()), 5).unwrap();
        let err = transport.save("a-1", &payload()).await.unwrap_err();
        assert!(matches!(err, SaveError::Unauthorized(ref body) if body == "token expired"));
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn rate_limiting() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), None, 5).unwrap();
        let err = transport.save("a-1", &payload()).await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::RateLimited {
                retry_after_ms: 3000
            }
        ));
    }

    #[tokio::test]
    async fn api_error_message_is_extracted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({"message": "attempt already submitted"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), None, 5).unwrap();
        let err = transport.save("a-1", &payload()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error (HTTP 409): attempt already submitted"
        );
    }

    #[test]
    fn debug_masks_token() {
        let transport = HttpTransport::new("http://localhost", Some("secret".into()), 5).unwrap();
        let debug = format!("{transport:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }
}
