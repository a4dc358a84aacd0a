use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Every way a chat turn can end without a reply.
///
/// Validation and admission failures are routine outcomes surfaced to the
/// client with a specific reason. Engine and internal failures are logged in
/// full and surfaced only as a generic message.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── Input ────────────────────────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── Rate limiting ────────────────────────────────────────────────────
    #[error("admission: {0}")]
    Admission(#[from] AdmissionError),

    // ── Generation engine ────────────────────────────────────────────────
    #[error("engine: {0}")]
    Engine(#[from] EngineError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

// ─── Validation errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message cannot be empty")]
    Empty,

    #[error("Message is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Message contains disallowed content")]
    Unsafe,
}

// ─── Admission errors ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("rate limited: {max_requests} requests per {window_secs}s exhausted")]
    RateLimited { max_requests: usize, window_secs: u64 },
}

// ─── Engine errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("engine returned malformed output: {0}")]
    MalformedOutput(String),
}

// ─── Config errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}
