mod availability;
mod submit;

pub use availability::HttpAvailabilityProbe;
pub use submit::HttpSubmitSink;

use crate::error::{CheckError, SubmitError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Header carrying the anti-forgery token on every engine request.
pub const TOKEN_HEADER: &str = "X-CSRFToken";

/// Resolved verdict for one identifier value. The message is the server's
/// text and is surfaced as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityVerdict {
    pub available: bool,
    pub message: String,
}

/// Payload forwarded on an accepted submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    #[serde(rename = "username")]
    pub identifier: String,
    #[serde(rename = "password")]
    pub credential: String,
}

/// Server acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: String,
}

/// Remote collaborator answering "is this identifier taken".
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn check(&self, identifier: &str) -> Result<AvailabilityVerdict, CheckError>;
}

/// Remote collaborator receiving a gated submission.
#[async_trait]
pub trait SubmitSink: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReceipt, SubmitError>;
}

/// An absent or empty token counts as missing; requests carrying it would be
/// rejected server-side anyway, so callers fail closed before sending.
pub(crate) fn normalize_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

pub(crate) fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|error| {
            warn!(%error, "http client build failed; using a default client without timeouts");
            Client::new()
        })
}
