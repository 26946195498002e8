use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `formgate`.
///
/// Each subsystem defines its own error enum. Library callers can match on
/// these to decide recovery strategy; config loading continues to use
/// `anyhow::Result` for ad-hoc context chains.
///
/// A rule that does not pass is *not* represented here: per-rule outcomes are
/// ordinary data (`RuleEvaluation { satisfied: false }`) that drive UI hints,
/// never error values.
#[derive(Debug, Error)]
pub enum FormError {
    // ── Config / wiring ──────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Availability check ───────────────────────────────────────────────
    #[error("availability check: {0}")]
    Check(#[from] CheckError),

    // ── Submission forwarding ────────────────────────────────────────────
    #[error("submit: {0}")]
    Submit(#[from] SubmitError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

/// Construction-time problems: bad config values, duplicate rule names,
/// unusable endpoints. These surface before a session exists; everything that
/// can go wrong *during* a session is converted into UI state instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),

    #[error("invalid endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },
}

// ─── Availability check errors ──────────────────────────────────────────────

/// Why an availability check failed to produce an answer.
///
/// None of these mean "identifier taken": that is a successful check that
/// resolved `available: false`. `MissingToken` is the fail-closed case: the
/// anti-forgery token was absent, so no request was issued at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("security token missing")]
    MissingToken,

    #[error("transport: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("decode: {0}")]
    Decode(String),

    #[error("request timed out")]
    Timeout,
}

// ─── Submission errors ──────────────────────────────────────────────────────

/// Failures while forwarding an apparently ready submission.
///
/// `Rejected` carries the server's message verbatim; the server stays
/// authoritative, so a rejection after a `Ready` gate is expected behavior,
/// not a client bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("security token missing")]
    MissingToken,

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("transport: {0}")]
    Transport(String),

    #[error("decode: {0}")]
    Decode(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, FormError>;
