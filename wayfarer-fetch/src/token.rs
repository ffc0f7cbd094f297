//! Bearer token lifecycle for providers using client-credentials OAuth.
//!
//! The token manager owns one cached token per provider and guards each
//! refresh with a per-provider async mutex, so concurrent callers during a
//! refresh coalesce into a single exchange and share its result.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use wayfarer_core::ProviderId;

use crate::error::{AuthError, FetchError};
use crate::transport::HttpClient;

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_SAFETY_MARGIN_SECS: i64 = 60;

/// TTL assumed when the exchange response omits `expires_in`.
const DEFAULT_TTL_SECS: i64 = 1800;

// ============================================================================
// Auth Token
// ============================================================================

/// A bearer token with its expiry. Owned by the token manager; adapters
/// receive a copy and never manage the lifecycle themselves.
#[derive(Clone, PartialEq)]
pub struct AuthToken {
    /// The bearer token value.
    pub value: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// True while the token is comfortably inside its validity window.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - Duration::seconds(EXPIRY_SAFETY_MARGIN_SECS)
    }

    /// Renders the `Authorization` header value.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============================================================================
// Token Endpoint
// ============================================================================

/// A provider's client-credentials exchange endpoint.
#[derive(Clone)]
pub struct TokenEndpoint {
    /// Exchange URL.
    pub url: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

impl fmt::Debug for TokenEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEndpoint")
            .field("url", &self.url)
            .field("client_id", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Wire shape of the exchange response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

// ============================================================================
// Token Manager
// ============================================================================

/// Cached token slot, guarded per provider.
#[derive(Debug, Default)]
struct TokenSlot {
    cached: Option<AuthToken>,
}

/// Per-provider token cache with single-flight refresh.
#[derive(Debug, Default)]
pub struct TokenManager {
    entries: HashMap<ProviderId, (TokenEndpoint, Arc<Mutex<TokenSlot>>)>,
}

impl TokenManager {
    /// Creates an empty manager with no registered endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider's exchange endpoint.
    pub fn register(&mut self, provider: ProviderId, endpoint: TokenEndpoint) {
        self.entries
            .insert(provider, (endpoint, Arc::new(Mutex::new(TokenSlot::default()))));
    }

    /// True when the provider has a registered endpoint.
    pub fn is_registered(&self, provider: ProviderId) -> bool {
        self.entries.contains_key(&provider)
    }

    /// Returns a valid token for the provider, refreshing if needed.
    ///
    /// A provider with no registered endpoint yields
    /// [`AuthError::MissingCredentials`] without any network traffic.
    /// Holding the slot's mutex across the exchange guarantees at most one
    /// refresh in flight per provider; concurrent callers wait for its
    /// result.
    #[instrument(skip(self, http))]
    pub async fn get(
        &self,
        http: &HttpClient,
        provider: ProviderId,
    ) -> Result<AuthToken, FetchError> {
        let (endpoint, slot) = self
            .entries
            .get(&provider)
            .ok_or(AuthError::MissingCredentials(provider))?;

        let mut slot = slot.lock().await;

        if let Some(token) = &slot.cached {
            if token.is_fresh(Utc::now()) {
                debug!(provider = %provider, "Reusing cached token");
                return Ok(token.clone());
            }
        }

        debug!(provider = %provider, "Exchanging client credentials");
        let token = Self::exchange(http, endpoint).await?;
        slot.cached = Some(token.clone());
        Ok(token)
    }

    /// Performs the client-credentials exchange.
    async fn exchange(http: &HttpClient, endpoint: &TokenEndpoint) -> Result<AuthToken, FetchError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", endpoint.client_id.as_str()),
            ("client_secret", endpoint.client_secret.as_str()),
        ];

        // Transient exchange failures ride the transport retry policy;
        // whatever non-2xx survives it is terminal for this refresh.
        let response = http.execute(http.post(&endpoint.url).form(&form)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::ExchangeFailed {
                status: status.as_u16(),
            }
            .into());
        }

        let body: TokenResponse = response.json().await?;
        let ttl = body.expires_in.unwrap_or(DEFAULT_TTL_SECS);

        Ok(AuthToken {
            value: body.access_token,
            expires_at: Utc::now() + Duration::seconds(ttl),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
