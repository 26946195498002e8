use super::{AvailabilityProbe, AvailabilityVerdict, TOKEN_HEADER, build_client, normalize_token};
use crate::config::AvailabilityConfig;
use crate::error::CheckError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Availability probe speaking the check endpoint's contract: the identifier
/// goes out as form data under `username`, the verdict comes back as
/// `{ "available": bool, "message": str }`.
pub struct HttpAvailabilityProbe {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpAvailabilityProbe {
    /// The token comes from page metadata at session construction, not from
    /// config; `None` or empty makes every check fail closed.
    #[must_use]
    pub fn new(config: &AvailabilityConfig, token: Option<String>) -> Self {
        Self {
            client: build_client(config.request_timeout_secs),
            endpoint: config.endpoint.clone(),
            token: normalize_token(token),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    available: bool,
    message: String,
}

fn classify_send_error(error: &reqwest::Error) -> CheckError {
    if error.is_timeout() {
        CheckError::Timeout
    } else {
        CheckError::Transport(error.to_string())
    }
}

#[async_trait]
impl AvailabilityProbe for HttpAvailabilityProbe {
    async fn check(&self, identifier: &str) -> Result<AvailabilityVerdict, CheckError> {
        let Some(token) = self.token.as_deref() else {
            return Err(CheckError::MissingToken);
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, token)
            .form(&[("username", identifier)])
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Status(status.as_u16()));
        }

        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| CheckError::Decode(e.to_string()))?;
        Ok(AvailabilityVerdict {
            available: body.available,
            message: body.message,
        })
    }
}
