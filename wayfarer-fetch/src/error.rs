//! Fetch error types.

use std::time::Duration;
use thiserror::Error;
use wayfarer_core::{Capability, ProviderId};

// ============================================================================
// Auth Error
// ============================================================================

/// Error type for token acquisition.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials configured for the provider. Terminal; never retried.
    #[error("Missing credentials for {0}")]
    MissingCredentials(ProviderId),

    /// The client-credentials exchange returned a non-2xx status.
    #[error("Token exchange failed with HTTP {status}")]
    ExchangeFailed {
        /// The HTTP status returned by the exchange endpoint.
        status: u16,
    },

    /// The provider rejected the presented credentials.
    #[error("{provider} rejected credentials: {detail}")]
    Rejected {
        /// The provider that rejected the request.
        provider: ProviderId,
        /// What the provider said, e.g. "HTTP 401" or "REQUEST_DENIED".
        detail: String,
    },
}

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for provider fetch operations.
///
/// Every adapter failure is tagged with one of these variants so the
/// fallback chain can decide whether to advance and callers can tell
/// "no results" apart from "could not determine".
#[derive(Debug, Error)]
pub enum FetchError {
    /// The adapter has no credentials or required configuration.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Authentication with the provider failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(#[from] AuthError),

    /// Rate limited by the provider after exhausting transport retries.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, when the provider said so.
        retry_after: Option<u64>,
    },

    /// Upstream failure: 5xx or connection-level error after retries.
    #[error("Upstream error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream {
        /// HTTP status, when the failure carried one.
        status: Option<u16>,
        /// Failure description.
        message: String,
    },

    /// The provider answered but had no matching data.
    #[error("No results from provider")]
    NoResults,

    /// The provider response could not be parsed into the data model.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request exceeded its time budget.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Every adapter in a fallback chain failed.
    #[error("All providers exhausted for {capability}")]
    Exhausted {
        /// The capability whose chain was exhausted.
        capability: Capability,
    },
}

impl FetchError {
    /// Short tag for logs and attempt records.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "not_configured",
            Self::AuthFailed(_) => "auth_failed",
            Self::RateLimited { .. } => "rate_limited",
            Self::Upstream { .. } => "upstream",
            Self::NoResults => "no_results",
            Self::Parse(_) => "parse",
            Self::Timeout(_) => "timeout",
            Self::Exhausted { .. } => "exhausted",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Duration::ZERO)
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Upstream {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
