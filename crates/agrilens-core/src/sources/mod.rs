//! One narrow fetcher per upstream, each with a real HTTP path and a
//! deterministic offline path selected by [`HttpClient::is_mock`].
//!
//! [`HttpClient::is_mock`]: crate::http_client::HttpClient::is_mock

pub mod climate;
pub mod geocoder;
pub mod market;
pub mod soil;
pub mod weather;

use std::fmt::{Display, Formatter};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, timeout or non-success upstream status.
    Unavailable,
    /// The upstream answered but the payload could not be used.
    InvalidPayload,
    /// The soil simulator returned its documented default pair, meaning it
    /// failed internally while reporting success.
    SentinelDefault,
    /// Every credential in a chain was attempted and failed.
    Exhausted,
    InvalidRequest,
    Internal,
}

/// Structured source error carried through chain invocation and
/// aggregation outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidPayload,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn sentinel_default(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::SentinelDefault,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Exhausted,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidPayload => "source.invalid_payload",
            SourceErrorKind::SentinelDefault => "source.sentinel_default",
            SourceErrorKind::Exhausted => "source.exhausted",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}
