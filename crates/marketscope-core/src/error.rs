use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation errors for caller-supplied parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid price source '{value}', expected one of alphavantage, finnhub, fmp")]
    InvalidPriceSource { value: String },
}

/// Failure classification for a load attempt.
///
/// `Cancelled` is a kind here rather than a separate type: the retry loop and
/// the load slots must tell it apart from real failures at every decision
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Upstream signalled rate limiting (HTTP 429).
    RateLimited,
    /// Upstream returned a non-success status or an unusable envelope.
    Upstream,
    /// Transport-level failure (timeout, connect, protocol).
    Transport,
    /// The request's cancellation token fired. Not a real failure.
    Cancelled,
}

/// Structured error produced by the transport and surfaced by load slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    kind: LoadErrorKind,
    message: String,
}

impl LoadError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::Upstream,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            kind: LoadErrorKind::Cancelled,
            message: String::from("request cancelled"),
        }
    }

    pub const fn kind(&self) -> LoadErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rate limiting and transient transport failures share one retry policy.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind,
            LoadErrorKind::RateLimited | LoadErrorKind::Transport
        )
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self.kind, LoadErrorKind::Cancelled)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            LoadErrorKind::RateLimited => "load.rate_limited",
            LoadErrorKind::Upstream => "load.upstream",
            LoadErrorKind::Transport => "load.transport",
            LoadErrorKind::Cancelled => "load.cancelled",
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_and_transport_are_retryable() {
        assert!(LoadError::rate_limited("429").retryable());
        assert!(LoadError::transport("connect reset").retryable());
        assert!(!LoadError::upstream("500").retryable());
        assert!(!LoadError::cancelled().retryable());
    }

    #[test]
    fn cancellation_is_distinguished_from_failures() {
        assert!(LoadError::cancelled().is_cancelled());
        assert!(!LoadError::upstream("boom").is_cancelled());
    }
}
