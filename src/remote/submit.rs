use super::{SubmitReceipt, SubmitSink, Submission, TOKEN_HEADER, build_client, normalize_token};
use crate::config::SubmitConfig;
use crate::error::SubmitError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Submit sink speaking the register endpoint's contract: JSON body out,
/// `{ "message": str }` back on acceptance, `{ "error": str }` on rejection.
/// Rejection text is returned verbatim; the server owns that wording.
pub struct HttpSubmitSink {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSubmitSink {
    #[must_use]
    pub fn new(config: &SubmitConfig, token: Option<String>) -> Self {
        Self {
            client: build_client(config.request_timeout_secs),
            endpoint: config.endpoint.clone(),
            token: normalize_token(token),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AcceptedBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RejectedBody {
    error: Option<String>,
}

#[async_trait]
impl SubmitSink for HttpSubmitSink {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReceipt, SubmitError> {
        let Some(token) = self.token.as_deref() else {
            return Err(SubmitError::MissingToken);
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, token)
            .json(submission)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: AcceptedBody = response
                .json()
                .await
                .map_err(|e| SubmitError::Decode(e.to_string()))?;
            return Ok(SubmitReceipt {
                message: body.message,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        match serde_json::from_str::<RejectedBody>(&text) {
            Ok(RejectedBody { error: Some(error) }) => Err(SubmitError::Rejected(error)),
            _ => Err(SubmitError::Decode(format!(
                "status {status} without error detail"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sink_for(server: &MockServer, token: Option<&str>) -> HttpSubmitSink {
        let config = SubmitConfig {
            endpoint: format!("{}/auth/register", server.uri()),
            ..SubmitConfig::default()
        };
        HttpSubmitSink::new(&config, token.map(str::to_string))
    }

    fn submission() -> Submission {
        Submission {
            identifier: "neo".into(),
            credential: "Password1!".into(),
        }
    }

    #[tokio::test]
    async fn forwards_json_with_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(header(TOKEN_HEADER, "tok-123"))
            .and(body_json(serde_json::json!({
                "username": "neo",
                "password": "Password1!"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Account created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = sink_for(&server, Some("tok-123"))
            .submit(&submission())
            .await
            .unwrap();
        assert_eq!(receipt.message, "Account created");
    }

    #[tokio::test]
    async fn rejection_text_is_surfaced_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": "Email already registered"
            })))
            .mount(&server)
            .await;

        let err = sink_for(&server, Some("tok"))
            .submit(&submission())
            .await
            .unwrap_err();
        assert_eq!(err, SubmitError::Rejected("Email already registered".into()));
    }

    #[tokio::test]
    async fn rejection_without_detail_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = sink_for(&server, Some("tok"))
            .submit(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_token_fails_closed_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = sink_for(&server, None)
            .submit(&submission())
            .await
            .unwrap_err();
        assert_eq!(err, SubmitError::MissingToken);
    }
}
